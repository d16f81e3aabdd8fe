pub mod sqlite;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user role. The privileged role is the one with the highest `sort`
/// value; ties break on lowest id. Roles are created once by the bootstrap
/// and never deleted by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sort: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: String,
    pub dob: NaiveDate,
    pub has_alias: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A linked external-site identity attached to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRecord {
    pub id: String,
    pub account_id: String,
    pub site: String,
    pub alias: String,
    pub is_primary: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait Storage: Send + Sync + Clone {
    // Roles
    async fn role_count(&self) -> Result<usize>;
    async fn create_role(&self, role: Role) -> Result<()>;
    /// The role with the highest `sort` value, lowest id on a tie.
    async fn privileged_role(&self) -> Result<Option<Role>>;
    async fn list_roles(&self) -> Result<Vec<Role>>;

    // Accounts
    async fn get_account(&self, id: &str) -> Result<Option<Account>>;
    /// The single account bound to the given role id. If the store holds
    /// more than one (an invariant this tool does not enforce), the oldest
    /// row wins.
    async fn find_account_by_role(&self, role_id: &str) -> Result<Option<Account>>;
    async fn create_account(&self, account: Account) -> Result<()>;
    async fn account_count(&self) -> Result<usize>;
    async fn update_account_credentials(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()>;
    async fn set_email_verified_at(&self, id: &str, at: DateTime<Utc>) -> Result<()>;
    async fn set_has_alias(&self, id: &str, has_alias: bool) -> Result<()>;

    // Aliases
    async fn create_alias(&self, alias: AliasRecord) -> Result<()>;
    async fn list_aliases(&self, account_id: &str) -> Result<Vec<AliasRecord>>;
    async fn alias_count(&self) -> Result<usize>;
}
