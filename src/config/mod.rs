use crate::error::{Result, SetupError};
use std::path::PathBuf;

/// Bootstrap configuration, resolved once from the process environment at
/// startup and passed into the orchestrator. Core logic never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Display name for the admin account (`ADMIN_USERNAME`).
    pub username: String,
    /// Login email for the admin account (`ADMIN_EMAIL`, required).
    pub email: String,
    /// Password for the admin account (`ADMIN_PASSWORD`, required).
    pub password: String,
    /// Optional external-site alias to link (`ADMIN_ALIAS`).
    pub alias: Option<String>,
    /// Enable the credential-reset path when the account already exists
    /// (`ADMIN_RESET`).
    pub reset: bool,
    /// Enable alias/verification side effects on the reset path
    /// (`APP_ENV_LOCAL_SETUP`).
    pub local_setup: bool,
    /// SQLite database file (`DATABASE_PATH`).
    pub database_path: PathBuf,
}

impl AdminConfig {
    /// Resolve configuration from the process environment. A `.env` file in
    /// the working directory is honored if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary lookup function. Empty and
    /// whitespace-only values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = non_empty(lookup("ADMIN_EMAIL"));
        let password = non_empty(lookup("ADMIN_PASSWORD"));
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(SetupError::Configuration(
                    "ADMIN_EMAIL and ADMIN_PASSWORD environment variables must be set."
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            username: non_empty(lookup("ADMIN_USERNAME")).unwrap_or_else(default_username),
            email,
            password,
            alias: non_empty(lookup("ADMIN_ALIAS")),
            reset: parse_bool(lookup("ADMIN_RESET")),
            local_setup: parse_bool(lookup("APP_ENV_LOCAL_SETUP")),
            database_path: non_empty(lookup("DATABASE_PATH"))
                .map(PathBuf::from)
                .unwrap_or_else(Self::default_database_path),
        })
    }

    pub fn default_database_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".admin-setup")
            .join("admin.db")
    }
}

fn default_username() -> String {
    "Admin".to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: Option<String>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_missing_email_or_password_fails() {
        let err = AdminConfig::from_lookup(lookup_from(&[("ADMIN_EMAIL", "a@b")])).unwrap_err();
        assert!(err.is_configuration());

        let err = AdminConfig::from_lookup(lookup_from(&[("ADMIN_PASSWORD", "pw")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_values_treated_as_absent() {
        let err = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_EMAIL", "   "),
            ("ADMIN_PASSWORD", "pw"),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_defaults_apply() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_EMAIL", "admin@test"),
            ("ADMIN_PASSWORD", "secret123"),
        ]))
        .expect("config should resolve");

        assert_eq!(config.username, "Admin");
        assert_eq!(config.email, "admin@test");
        assert_eq!(config.alias, None);
        assert!(!config.reset);
        assert!(!config.local_setup);
        assert_eq!(config.database_path, AdminConfig::default_database_path());
    }

    #[test]
    fn test_all_values_resolve() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_USERNAME", "Root"),
            ("ADMIN_EMAIL", "admin@test"),
            ("ADMIN_PASSWORD", "secret123"),
            ("ADMIN_ALIAS", "artuser"),
            ("ADMIN_RESET", "true"),
            ("APP_ENV_LOCAL_SETUP", "1"),
            ("DATABASE_PATH", "/tmp/admin.db"),
        ]))
        .expect("config should resolve");

        assert_eq!(config.username, "Root");
        assert_eq!(config.alias.as_deref(), Some("artuser"));
        assert!(config.reset);
        assert!(config.local_setup);
        assert_eq!(config.database_path, PathBuf::from("/tmp/admin.db"));
    }

    #[test]
    fn test_bool_forms() {
        for truthy in ["1", "true", "TRUE", "yes", "on", " true "] {
            assert!(parse_bool(Some(truthy.to_string())), "{truthy:?}");
        }
        for falsy in ["0", "false", "no", "off", "", "2"] {
            assert!(!parse_bool(Some(falsy.to_string())), "{falsy:?}");
        }
        assert!(!parse_bool(None));
    }
}
