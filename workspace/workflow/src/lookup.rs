//! Lookups and deletion of regular users and chefs.

use model::Role;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

use crate::error::{Result, WorkflowError};
use crate::repository;
use crate::views::{ChefView, RegularUserView};

/// All regular users. An empty table is reported as `NotFound`, not as an
/// empty list.
#[instrument(skip(db))]
pub async fn get_all_regular_users(db: &DatabaseConnection) -> Result<Vec<RegularUserView>> {
    let users = repository::find_all_of_kind(db, Role::RegularUser).await?;
    if users.is_empty() {
        warn!("No regular users found in the database");
        return Err(WorkflowError::not_found("No regular users found"));
    }

    info!("Found {} regular users in the database", users.len());
    let mut views = Vec::with_capacity(users.len());
    for user in users {
        views.push(RegularUserView::load(db, user).await?);
    }
    Ok(views)
}

#[instrument(skip(db))]
pub async fn get_regular_user(db: &DatabaseConnection, id: i32) -> Result<RegularUserView> {
    match repository::find_user_of_kind(db, id, Role::RegularUser).await? {
        Some(user) => RegularUserView::load(db, user).await,
        None => {
            warn!("No regular user found in the database with ID {}", id);
            Err(WorkflowError::not_found("No regular user found"))
        }
    }
}

#[instrument(skip(db))]
pub async fn get_regular_user_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<RegularUserView> {
    match repository::find_first_by_name(db, name, Role::RegularUser).await? {
        Some(user) => RegularUserView::load(db, user).await,
        None => {
            warn!("No regular user found in the database with name {}", name);
            Err(WorkflowError::not_found("Regular user not found"))
        }
    }
}

/// Deletes the user row. The cookbook stays behind with its owner cleared.
#[instrument(skip(db))]
pub async fn delete_regular_user(db: &DatabaseConnection, id: i32) -> Result<()> {
    if repository::find_user_of_kind(db, id, Role::RegularUser).await?.is_none() {
        warn!("There is no regular user found with ID {}", id);
        return Err(WorkflowError::not_found("No regular user found"));
    }

    repository::delete_user(db, id).await?;
    info!("Deleted regular user {} from the database", id);
    Ok(())
}

/// All chefs with their recipes; `NotFound` when there are none.
#[instrument(skip(db))]
pub async fn get_all_chefs(db: &DatabaseConnection) -> Result<Vec<ChefView>> {
    let chefs = repository::find_all_of_kind(db, Role::Chef).await?;
    if chefs.is_empty() {
        warn!("No chefs found in the database");
        return Err(WorkflowError::not_found("No chefs found"));
    }

    let mut views = Vec::with_capacity(chefs.len());
    for chef in chefs {
        views.push(ChefView::load(db, chef).await?);
    }
    Ok(views)
}

#[instrument(skip(db))]
pub async fn get_chef(db: &DatabaseConnection, id: i32) -> Result<ChefView> {
    match repository::find_user_of_kind(db, id, Role::Chef).await? {
        Some(chef) => ChefView::load(db, chef).await,
        None => {
            warn!("No chef found in the database with ID {}", id);
            Err(WorkflowError::not_found("No chef found"))
        }
    }
}

/// Deletes a chef; their recipes go with them.
#[instrument(skip(db))]
pub async fn delete_chef(db: &DatabaseConnection, id: i32) -> Result<()> {
    if repository::find_user_of_kind(db, id, Role::Chef).await?.is_none() {
        warn!("There is no chef found with ID {}", id);
        return Err(WorkflowError::not_found("No chef found"));
    }

    repository::delete_user(db, id).await?;
    info!("Deleted chef {} from the database", id);
    Ok(())
}
