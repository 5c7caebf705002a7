use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use model::Role;
use tracing::{debug, info, instrument};
use workflow::recipes;
use workflow::validation::RecipeForm;
use workflow::views::RecipeView;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extract::{AppJson, ValidQuery};
use crate::schemas::{AppState, ByNameQuery};

/// Publish a recipe as the calling chef
#[utoipa::path(
    post,
    path = "/recipe",
    tag = "recipes",
    security(("basic_auth" = [])),
    request_body = RecipeForm,
    responses(
        (status = 201, description = "Recipe created", body = RecipeView),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 401, description = "Not a chef", body = ErrorResponse),
        (status = 409, description = "Recipe name taken (code 3)", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_recipe(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    AppJson(form): AppJson<RecipeForm>,
) -> Result<(StatusCode, Json<RecipeView>), AppError> {
    caller.require_any(&[Role::Chef])?;

    let created = recipes::create_recipe(&state.db, &caller, &form).await?;
    info!("Recipe {} created by chef {}", created.id, caller.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Find a recipe by name
#[utoipa::path(
    get,
    path = "/recipe/by_name",
    tag = "recipes",
    security(("basic_auth" = [])),
    params(ByNameQuery),
    responses(
        (status = 200, description = "Recipe found", body = RecipeView),
        (status = 400, description = "Missing or empty name", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No recipe with that name", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_recipe_by_name(
    Authenticated(_caller): Authenticated,
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ByNameQuery>,
) -> Result<Json<RecipeView>, AppError> {
    debug!("Looking up recipe named {}", query.name);
    Ok(Json(recipes::get_recipe_by_name(&state.db, &query.name).await?))
}
