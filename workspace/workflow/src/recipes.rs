//! Recipes published by chefs.

use model::Role;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

use crate::caller::Caller;
use crate::error::{Result, WorkflowError};
use crate::repository;
use crate::validation::{validate_recipe_form, RecipeForm};
use crate::views::RecipeView;

/// Publishes a recipe owned by the calling chef.
#[instrument(skip(db))]
pub async fn create_recipe(
    db: &DatabaseConnection,
    caller: &Caller,
    form: &RecipeForm,
) -> Result<RecipeView> {
    caller.require_any(&[Role::Chef])?;
    validate_recipe_form(form)?;

    let created =
        repository::insert_recipe(db, caller.id, &form.name, form.description.clone()).await?;
    info!("Chef {} created recipe {} ({})", caller.id, created.id, created.name);
    Ok(RecipeView::from(created))
}

#[instrument(skip(db))]
pub async fn get_recipe_by_name(db: &DatabaseConnection, name: &str) -> Result<RecipeView> {
    repository::find_recipe_by_name(db, name)
        .await?
        .map(RecipeView::from)
        .ok_or_else(|| {
            warn!("No recipe found with name {}", name);
            WorkflowError::not_found("Recipe not found")
        })
}

/// Recipes owned by a chef; `NotFound` if the chef does not exist.
#[instrument(skip(db))]
pub async fn recipes_by_chef(db: &DatabaseConnection, chef_id: i32) -> Result<Vec<RecipeView>> {
    if repository::find_user_of_kind(db, chef_id, Role::Chef).await?.is_none() {
        warn!("No chef found with ID {}", chef_id);
        return Err(WorkflowError::not_found("No chef found"));
    }

    let recipes = repository::recipes_of(db, chef_id).await?;
    Ok(recipes.into_iter().map(RecipeView::from).collect())
}
