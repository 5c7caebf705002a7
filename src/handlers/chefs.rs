use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use model::Role;
use tracing::{debug, info, instrument, trace};
use workflow::validation::{UpdateChefForm, UserForm};
use workflow::views::{ChefView, RecipeView};
use workflow::{lookup, profile, recipes, registration};

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::schemas::{AppState, MessageResponse};

/// List all chefs
#[utoipa::path(
    get,
    path = "/chef",
    tag = "chefs",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Chefs with their recipes", body = Vec<ChefView>),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "There are no chefs", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chefs(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChefView>>, AppError> {
    trace!("Entering get_chefs function");
    caller.require_any(&[Role::Admin])?;

    let chefs = lookup::get_all_chefs(&state.db).await?;
    debug!("Returning {} chefs", chefs.len());
    Ok(Json(chefs))
}

/// Create a chef
#[utoipa::path(
    post,
    path = "/chef",
    tag = "chefs",
    security(("basic_auth" = [])),
    request_body = UserForm,
    responses(
        (status = 201, description = "Chef created", body = ChefView),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Email (code 1) or username (code 2) already taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state, form))]
pub async fn create_chef(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    AppJson(form): AppJson<UserForm>,
) -> Result<(StatusCode, Json<ChefView>), AppError> {
    trace!("Entering create_chef function");
    caller.require_any(&[Role::Admin])?;

    let created = registration::create_chef(&state.db, &form).await?;
    info!("Chef created with ID: {} by admin {}", created.id, caller.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a chef by ID
#[utoipa::path(
    get,
    path = "/chef/{id}",
    tag = "chefs",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Chef ID")),
    responses(
        (status = 200, description = "Chef found", body = ChefView),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Chef not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chef(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<ChefView>, AppError> {
    trace!("Entering get_chef function");
    caller.require_any(&[Role::Admin])?;

    Ok(Json(lookup::get_chef(&state.db, id).await?))
}

/// Update a chef
///
/// Admins may update any chef and replace its recipe list with
/// `recipe_ids`; a chef may only update their own profile.
#[utoipa::path(
    put,
    path = "/chef/{id}",
    tag = "chefs",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Chef ID")),
    request_body = UpdateChefForm,
    responses(
        (status = 200, description = "Chef updated", body = ChefView),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
        (status = 401, description = "Not allowed to update this chef", body = ErrorResponse),
        (status = 404, description = "Chef or listed recipe not found", body = ErrorResponse),
        (status = 409, description = "Unique field taken or record modified concurrently", body = ErrorResponse)
    )
)]
#[instrument(skip(state, form))]
pub async fn update_chef(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    AppJson(form): AppJson<UpdateChefForm>,
) -> Result<Json<ChefView>, AppError> {
    trace!("Entering update_chef function");
    caller.require_any(&[Role::Admin, Role::Chef])?;

    let updated = profile::update_chef(&state.db, &caller, id, &form).await?;
    info!("Chef {} updated", id);
    Ok(Json(updated))
}

/// Delete a chef together with their recipes
#[utoipa::path(
    delete,
    path = "/chef/{id}",
    tag = "chefs",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Chef ID")),
    responses(
        (status = 200, description = "Chef deleted", body = MessageResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Chef not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_chef(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    trace!("Entering delete_chef function");
    caller.require_any(&[Role::Admin])?;

    lookup::delete_chef(&state.db, id).await?;
    info!("Chef {} deleted by admin {}", id, caller.id);
    Ok(Json(MessageResponse {
        message: format!("Chef with ID {} has been successfully deleted.", id),
    }))
}

/// List the recipes of a chef
#[utoipa::path(
    get,
    path = "/chef/{id}/recipes",
    tag = "chefs",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Chef ID")),
    responses(
        (status = 200, description = "Recipes of the chef", body = Vec<RecipeView>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Chef not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chef_recipes(
    AppPath(id): AppPath<i32>,
    Authenticated(_caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeView>>, AppError> {
    trace!("Entering get_chef_recipes function");
    Ok(Json(recipes::recipes_by_chef(&state.db, id).await?))
}
