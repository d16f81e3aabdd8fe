use thiserror::Error;

pub type Result<T, E = SetupError> = std::result::Result<T, E>;

/// Failure classes surfaced by the bootstrap procedure.
///
/// Configuration errors are detected before any store access and abort the
/// run. Storage and account-service errors abort the remaining steps of the
/// current branch; there is no rollback or retry — the operator re-runs the
/// command.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A required environment value is missing.
    #[error("{0}")]
    Configuration(String),

    /// A read or write against the persistent store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The account service rejected or failed a create/update.
    #[error("account service error: {0}")]
    AccountService(String),
}

impl SetupError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<sqlx::Error> for SetupError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for SetupError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Storage(err.to_string())
    }
}
