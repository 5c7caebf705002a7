//! Role-gated profile updates for regular users and chefs.

use model::Role;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument, warn};

use crate::caller::Caller;
use crate::error::{Result, WorkflowError};
use crate::password::hash_password;
use crate::repository;
use crate::validation::{validate_update_form, UpdateChefForm, UpdateUserForm};
use crate::views::{ChefView, RegularUserView};

/// What an authorized update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    /// Admin acting on anyone; may also replace a chef's recipes.
    Administrative,
    /// A user editing their own profile.
    OwnProfile,
}

/// Decides whether `caller` may update the user `target_id` of kind
/// `target_kind`.
///
/// Admins may update anyone. Regular users and chefs may only update
/// themselves, through the endpoint of their own kind.
pub fn authorize_profile_update(
    caller: &Caller,
    target_id: i32,
    target_kind: Role,
) -> Result<UpdateScope> {
    match caller.role {
        Role::Admin => Ok(UpdateScope::Administrative),
        Role::RegularUser | Role::Chef if caller.role == target_kind && caller.id == target_id => {
            Ok(UpdateScope::OwnProfile)
        }
        Role::RegularUser | Role::Chef => {
            warn!(
                "User {} ({}) may not update {} {}",
                caller.id, caller.role, target_kind, target_id
            );
            Err(WorkflowError::unauthorized(match target_kind {
                Role::Chef => "Not authorized to update chef",
                Role::RegularUser | Role::Admin => "Not authorized to update regular user",
            }))
        }
    }
}

#[instrument(skip(db, form))]
pub async fn update_regular_user(
    db: &DatabaseConnection,
    caller: &Caller,
    id: i32,
    form: &UpdateUserForm,
) -> Result<RegularUserView> {
    let scope = authorize_profile_update(caller, id, Role::RegularUser)?;
    debug!("User {} updating regular user {} with scope {:?}", caller.id, id, scope);
    validate_update_form(form)?;

    let current = repository::find_user_of_kind(db, id, Role::RegularUser)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("No regular user found with ID {}", id)))?;

    let password_hash = hash_password(&form.password).await?;
    let updated = repository::update_profile(db, &current, form, password_hash).await?;
    info!("Regular user {} updated by user {}", id, caller.id);

    RegularUserView::load(db, updated).await
}

/// Updates a chef. When an admin sends `recipe_ids`, the chef's recipe list
/// is replaced wholesale in the same transaction.
#[instrument(skip(db, form))]
pub async fn update_chef(
    db: &DatabaseConnection,
    caller: &Caller,
    id: i32,
    form: &UpdateChefForm,
) -> Result<ChefView> {
    let scope = authorize_profile_update(caller, id, Role::Chef)?;
    debug!("User {} updating chef {} with scope {:?}", caller.id, id, scope);
    validate_update_form(&form.profile)?;
    let password_hash = hash_password(&form.profile.password).await?;

    let txn = db.begin().await?;
    let current = repository::find_user_of_kind(&txn, id, Role::Chef)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("No chef found with ID {}", id)))?;

    let updated = repository::update_profile(&txn, &current, &form.profile, password_hash).await?;

    match (scope, &form.recipe_ids) {
        (UpdateScope::Administrative, Some(recipe_ids)) => {
            for recipe_id in recipe_ids {
                if repository::find_recipe_by_id(&txn, *recipe_id).await?.is_none() {
                    warn!("Recipe {} does not exist, aborting chef update", recipe_id);
                    return Err(WorkflowError::not_found(format!(
                        "No recipe found with ID {}",
                        recipe_id
                    )));
                }
            }
            repository::replace_recipes(&txn, id, recipe_ids).await?;
            info!("Admin {} replaced the recipes of chef {}", caller.id, id);
        }
        (UpdateScope::OwnProfile, Some(_)) => {
            debug!("Ignoring recipe list sent by chef {} for their own profile", caller.id);
        }
        (_, None) => {}
    }

    let view = ChefView::load(&txn, updated).await?;
    txn.commit().await?;

    info!("Chef {} updated by user {}", id, caller.id);
    Ok(view)
}
