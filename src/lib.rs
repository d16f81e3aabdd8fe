pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod storage;

pub use config::AdminConfig;
pub use error::{Result, SetupError};
pub use storage::Storage;

use services::AccountService;

/// Open the store and run the bootstrap with the given configuration.
pub async fn run(config: &AdminConfig) -> Result<()> {
    tracing::info!("Using database at {}", config.database_path.display());

    let storage = storage::sqlite::SqliteStorage::new(&config.database_path).await?;
    let accounts = AccountService::new(storage.clone());

    core::bootstrap::run_bootstrap(config, &storage, &accounts).await
}
