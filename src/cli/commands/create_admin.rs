use anyhow::{Context, Result};
use sea_orm::Database;
use tracing::{debug, error, info};
use workflow::registration;
use workflow::validation::UserForm;

/// Account details for a new administrator.
pub struct AdminAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub lastname: String,
}

impl From<AdminAccount> for UserForm {
    fn from(account: AdminAccount) -> Self {
        UserForm {
            username: Some(account.username),
            name: Some(account.name),
            lastname: Some(account.lastname),
            email: Some(account.email),
            confirmed_password: Some(account.password.clone()),
            password: Some(account.password),
        }
    }
}

pub async fn create_admin(database_url: &str, account: AdminAccount) -> Result<()> {
    debug!("Database URL: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    let form = UserForm::from(account);
    match registration::create_admin(&db, &form).await {
        Ok(admin) => {
            info!("Created admin {} ({}) with ID {}", admin.username, admin.email, admin.id);
            Ok(())
        }
        Err(e) => {
            error!("Failed to create admin: {}", e);
            Err(e.into())
        }
    }
}
