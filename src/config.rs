use std::path::PathBuf;

use anyhow::Result;
use sea_orm::Database;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cookbook.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Load variables from a `.env` file, if there is one. Returns the file
/// that was read.
pub fn load_environment() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Initialize application state for the given database
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    debug!("Database connection established");

    Ok(AppState { db })
}
