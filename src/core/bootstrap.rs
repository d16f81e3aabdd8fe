use crate::config::AdminConfig;
use crate::error::{Result, SetupError};
use crate::services::account::{AccountService, NewAccount};
use crate::storage::{Account, AliasRecord, Role, Storage};
use chrono::{NaiveDate, Utc};

/// External site the admin alias is linked against.
pub const ALIAS_SITE: &str = "deviantart";

pub const PRIVILEGED_SORT: i64 = 1;
pub const STANDARD_SORT: i64 = 0;

/// Placeholder date of birth for the admin account.
fn placeholder_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date")
}

/// What a bootstrap run will do, decided before any write happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapAction {
    /// No account holds the privileged role; create one.
    CreateAccount,
    /// The account exists and no reset was requested.
    NoOp,
    /// Update the existing account's email and password.
    ResetCredentials,
    /// Credential reset plus alias/verification side effects.
    ResetCredentialsWithExtras,
}

/// Pure decision function for the orchestrator. Side effects live in
/// [`run_bootstrap`], which applies the returned action.
pub fn plan(account_exists: bool, reset: bool, local_setup: bool) -> BootstrapAction {
    match (account_exists, reset, local_setup) {
        (false, _, _) => BootstrapAction::CreateAccount,
        (true, false, _) => BootstrapAction::NoOp,
        (true, true, false) => BootstrapAction::ResetCredentials,
        (true, true, true) => BootstrapAction::ResetCredentialsWithExtras,
    }
}

/// Guarantee the minimal two-tier role hierarchy exists and return the
/// privileged role.
///
/// With an empty role table, the admin (sort=1) and member (sort=0) roles are
/// created, in that order. Otherwise the existing role with the highest sort
/// wins; a tie breaks on lowest id.
pub async fn ensure_privileged_role<S: Storage>(storage: &S) -> Result<Role> {
    if storage.role_count().await? == 0 {
        let now = Utc::now();
        let admin = Role {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Admin".to_string(),
            description:
                "The site admin. Has the ability to view/edit any data on the site.".to_string(),
            sort: PRIVILEGED_SORT,
            created_at: now,
        };
        storage.create_role(admin.clone()).await?;
        storage
            .create_role(Role {
                id: uuid::Uuid::new_v4().to_string(),
                name: "Member".to_string(),
                description: "A regular member of the site.".to_string(),
                sort: STANDARD_SORT,
                created_at: now,
            })
            .await?;

        println!("User roles not found. Default user roles (admin and basic member) created.");
        return Ok(admin);
    }

    storage
        .privileged_role()
        .await?
        .ok_or_else(|| SetupError::Storage("role table emptied during bootstrap".to_string()))
}

/// Run the full bootstrap procedure against the given storage and account
/// service. Idempotent: re-running with `reset` disabled changes nothing.
pub async fn run_bootstrap<S: Storage>(
    config: &AdminConfig,
    storage: &S,
    accounts: &AccountService<S>,
) -> Result<()> {
    println!("********************");
    println!("* ADMIN USER SETUP *");
    println!("********************\n");

    let role = ensure_privileged_role(storage).await?;
    let existing = storage.find_account_by_role(&role.id).await?;

    match plan(existing.is_some(), config.reset, config.local_setup) {
        BootstrapAction::CreateAccount => {
            create_admin_account(config, storage, accounts, &role).await?;
        }
        BootstrapAction::NoOp => {
            let account = existing.expect("plan requires an existing account");
            println!("Admin account [{}] already exists.", account.name);
            println!("No changes made to existing admin account.");
            println!("Action completed.");
        }
        BootstrapAction::ResetCredentials => {
            let account = existing.expect("plan requires an existing account");
            println!("Admin account [{}] already exists.", account.name);
            reset_credentials(config, accounts, &account).await?;
            println!("Updates complete.");
            println!("Action completed.");
        }
        BootstrapAction::ResetCredentialsWithExtras => {
            let account = existing.expect("plan requires an existing account");
            println!("Admin account [{}] already exists.", account.name);
            let account = reset_credentials(config, accounts, &account).await?;
            apply_local_setup_extras(config, storage, &account).await?;
            println!("Updates complete.");
            println!("Action completed.");
        }
    }

    Ok(())
}

async fn create_admin_account<S: Storage>(
    config: &AdminConfig,
    storage: &S,
    accounts: &AccountService<S>,
    role: &Role,
) -> Result<()> {
    println!(
        "Setting up admin account. This account will have access to all site data, \
         please make sure to keep the email and password secret!"
    );

    let account = accounts
        .create(NewAccount {
            name: config.username.clone(),
            email: config.email.clone(),
            role_id: role.id.clone(),
            password: config.password.clone(),
            dob: placeholder_dob(),
            has_alias: config.alias.is_some(),
        })
        .await?;

    // Always treat the admin account as pre-verified on creation.
    storage
        .set_email_verified_at(&account.id, Utc::now())
        .await?;

    if let Some(alias) = &config.alias {
        attach_alias(storage, &account.id, alias).await?;
    }

    println!("Admin account created. You can now log in with the registered email and password.");
    println!(
        "If necessary, you can run this command again to change the email address \
         and password of the admin account."
    );
    Ok(())
}

async fn reset_credentials<S: Storage>(
    config: &AdminConfig,
    accounts: &AccountService<S>,
    account: &Account,
) -> Result<Account> {
    println!("Resetting email address and password for this account.");

    let account = accounts
        .update_credentials(&account.id, &config.email, &config.password)
        .await?;

    println!("Admin account email and password changed.");
    Ok(account)
}

async fn apply_local_setup_extras<S: Storage>(
    config: &AdminConfig,
    storage: &S,
    account: &Account,
) -> Result<()> {
    if let Some(alias) = &config.alias {
        if !account.has_alias {
            println!("Adding user alias...");
            storage.set_has_alias(&account.id, true).await?;
            attach_alias(storage, &account.id, alias).await?;
        }
    }

    println!("Marking email address as verified...");
    storage
        .set_email_verified_at(&account.id, Utc::now())
        .await?;
    Ok(())
}

async fn attach_alias<S: Storage>(storage: &S, account_id: &str, alias: &str) -> Result<()> {
    storage
        .create_alias(AliasRecord {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            site: ALIAS_SITE.to_string(),
            alias: alias.to_string(),
            is_primary: true,
            is_visible: true,
            created_at: Utc::now(),
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_creates_when_no_account() {
        // reset/local-setup flags are irrelevant on the create path
        assert_eq!(plan(false, false, false), BootstrapAction::CreateAccount);
        assert_eq!(plan(false, true, false), BootstrapAction::CreateAccount);
        assert_eq!(plan(false, true, true), BootstrapAction::CreateAccount);
        assert_eq!(plan(false, false, true), BootstrapAction::CreateAccount);
    }

    #[test]
    fn test_plan_noop_without_reset() {
        assert_eq!(plan(true, false, false), BootstrapAction::NoOp);
        // local-setup alone does not enable the reset path
        assert_eq!(plan(true, false, true), BootstrapAction::NoOp);
    }

    #[test]
    fn test_plan_reset_paths() {
        assert_eq!(plan(true, true, false), BootstrapAction::ResetCredentials);
        assert_eq!(
            plan(true, true, true),
            BootstrapAction::ResetCredentialsWithExtras
        );
    }

    #[test]
    fn test_placeholder_dob() {
        assert_eq!(placeholder_dob().to_string(), "1970-01-01");
    }
}
