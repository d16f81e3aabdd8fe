use crate::core::password;
use crate::error::{Result, SetupError};
use crate::storage::{Account, Storage};
use chrono::{NaiveDate, Utc};

/// Fields for a new account, validated and persisted by [`AccountService`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub password: String,
    pub dob: NaiveDate,
    pub has_alias: bool,
}

/// Creates and updates accounts. Validates fields and hashes passwords
/// before anything touches the store; callers never see plaintext
/// credentials persisted.
pub struct AccountService<S: Storage> {
    storage: S,
}

impl<S: Storage> AccountService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn create(&self, fields: NewAccount) -> Result<Account> {
        validate_name(&fields.name)?;
        validate_email(&fields.email)?;
        validate_password(&fields.password)?;

        let now = Utc::now();
        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            email: fields.email,
            password_hash: password::hash_password(&fields.password)?,
            role_id: fields.role_id,
            dob: fields.dob,
            has_alias: fields.has_alias,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        };

        self.storage.create_account(account.clone()).await?;
        Ok(account)
    }

    pub async fn update_credentials(
        &self,
        id: &str,
        email: &str,
        new_password: &str,
    ) -> Result<Account> {
        validate_email(email)?;
        validate_password(new_password)?;

        let password_hash = password::hash_password(new_password)?;
        self.storage
            .update_account_credentials(id, email, &password_hash)
            .await?;

        self.storage.get_account(id).await?.ok_or_else(|| {
            SetupError::AccountService(format!("account '{}' missing after update", id))
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SetupError::AccountService("name cannot be empty".into()));
    }
    if name.len() > 64 {
        return Err(SetupError::AccountService(
            "name too long (max 64 characters)".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(SetupError::AccountService(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(SetupError::AccountService(
            "password cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Admin").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@test").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password("").is_err());
    }
}
