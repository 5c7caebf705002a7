use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use model::Role;
use tracing::{info, instrument};
use workflow::allergens;
use workflow::validation::AllergenForm;
use workflow::views::AllergenView;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::schemas::AppState;

/// List all allergens
#[utoipa::path(
    get,
    path = "/allergens",
    tag = "allergens",
    responses(
        (status = 200, description = "All allergens, possibly none", body = Vec<AllergenView>)
    )
)]
#[instrument(skip(state))]
pub async fn get_allergens(
    State(state): State<AppState>,
) -> Result<Json<Vec<AllergenView>>, AppError> {
    Ok(Json(allergens::list_allergens(&state.db).await?))
}

/// Get an allergen by ID
#[utoipa::path(
    get,
    path = "/allergens/{id}",
    tag = "allergens",
    params(("id" = i32, Path, description = "Allergen ID")),
    responses(
        (status = 200, description = "Allergen found", body = AllergenView),
        (status = 404, description = "Allergen not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_allergen(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<Json<AllergenView>, AppError> {
    Ok(Json(allergens::get_allergen(&state.db, id).await?))
}

/// Create an allergen
#[utoipa::path(
    post,
    path = "/allergens",
    tag = "allergens",
    security(("basic_auth" = [])),
    request_body = AllergenForm,
    responses(
        (status = 201, description = "Allergen created", body = AllergenView),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Allergen name taken (code 3)", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_allergen(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    AppJson(form): AppJson<AllergenForm>,
) -> Result<(StatusCode, Json<AllergenView>), AppError> {
    caller.require_any(&[Role::Admin])?;

    let created = allergens::create_allergen(&state.db, &form).await?;
    info!("Allergen {} created by admin {}", created.id, caller.id);
    Ok((StatusCode::CREATED, Json(created)))
}
