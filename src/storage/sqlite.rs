use super::{Account, AliasRecord, Role, Storage};
use crate::error::{Result, SetupError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SetupError::Storage(format!(
                        "failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

fn role_from_row(r: &SqliteRow) -> Role {
    Role {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        sort: r.get("sort"),
        created_at: r.get("created_at"),
    }
}

fn account_from_row(r: &SqliteRow) -> Account {
    Account {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        password_hash: r.get("password_hash"),
        role_id: r.get("role_id"),
        dob: r.get("dob"),
        has_alias: r.get("has_alias"),
        email_verified_at: r.get("email_verified_at"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

fn alias_from_row(r: &SqliteRow) -> AliasRecord {
    AliasRecord {
        id: r.get("id"),
        account_id: r.get("account_id"),
        site: r.get("site"),
        alias: r.get("alias"),
        is_primary: r.get("is_primary"),
        is_visible: r.get("is_visible"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn role_count(&self) -> Result<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as usize)
    }

    async fn create_role(&self, role: Role) -> Result<()> {
        sqlx::query(
            "INSERT INTO roles (id, name, description, sort, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(role.id)
        .bind(role.name)
        .bind(role.description)
        .bind(role.sort)
        .bind(role.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn privileged_role(&self) -> Result<Option<Role>> {
        let row = sqlx::query(
            "SELECT id, name, description, sort, created_at FROM roles
             ORDER BY sort DESC, id ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| role_from_row(&r)))
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query(
            "SELECT id, name, description, sort, created_at FROM roles ORDER BY sort DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(role_from_row).collect())
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role_id, dob, has_alias, email_verified_at,
                    created_at, updated_at
             FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| account_from_row(&r)))
    }

    async fn find_account_by_role(&self, role_id: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role_id, dob, has_alias, email_verified_at,
                    created_at, updated_at
             FROM accounts WHERE role_id = ?
             ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| account_from_row(&r)))
    }

    async fn create_account(&self, account: Account) -> Result<()> {
        sqlx::query(
            "INSERT INTO accounts (id, name, email, password_hash, role_id, dob, has_alias,
                                   email_verified_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(account.id)
        .bind(account.name)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.role_id)
        .bind(account.dob)
        .bind(account.has_alias)
        .bind(account.email_verified_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn account_count(&self) -> Result<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as usize)
    }

    async fn update_account_credentials(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET email = ?, password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(email)
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_email_verified_at(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE accounts SET email_verified_at = ?, updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_has_alias(&self, id: &str, has_alias: bool) -> Result<()> {
        sqlx::query("UPDATE accounts SET has_alias = ?, updated_at = ? WHERE id = ?")
            .bind(has_alias)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_alias(&self, alias: AliasRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO account_aliases (id, account_id, site, alias, is_primary, is_visible,
                                          created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(alias.id)
        .bind(alias.account_id)
        .bind(alias.site)
        .bind(alias.alias)
        .bind(alias.is_primary)
        .bind(alias.is_visible)
        .bind(alias.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_aliases(&self, account_id: &str) -> Result<Vec<AliasRecord>> {
        let rows = sqlx::query(
            "SELECT id, account_id, site, alias, is_primary, is_visible, created_at
             FROM account_aliases WHERE account_id = ? ORDER BY created_at ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(alias_from_row).collect())
    }

    async fn alias_count(&self) -> Result<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM account_aliases")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as usize)
    }
}
