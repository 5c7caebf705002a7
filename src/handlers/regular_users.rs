use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use model::Role;
use tracing::{debug, info, instrument, trace};
use workflow::validation::{UpdateUserForm, UserForm};
use workflow::views::RegularUserView;
use workflow::{allergens, lookup, profile, registration};

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extract::{AppJson, AppPath, ValidQuery};
use crate::schemas::{AppState, ByNameQuery, MessageResponse};

/// List all regular users
#[utoipa::path(
    get,
    path = "/regularuser",
    tag = "regular-users",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Regular users with their allergens", body = Vec<RegularUserView>),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "There are no regular users", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_users(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<RegularUserView>>, AppError> {
    trace!("Entering get_regular_users function");
    caller.require_any(&[Role::Admin])?;

    let regular_users = lookup::get_all_regular_users(&state.db).await?;
    debug!("Returning {} regular users", regular_users.len());
    Ok(Json(regular_users))
}

/// Register a new regular user
///
/// Open to anonymous callers. Creates the user and their empty cookbook.
#[utoipa::path(
    post,
    path = "/regularuser",
    tag = "regular-users",
    request_body = UserForm,
    responses(
        (status = 201, description = "Regular user registered", body = RegularUserView),
        (status = 400, description = "Invalid registration form", body = ErrorResponse),
        (status = 409, description = "Email (code 1) or username (code 2) already taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state, form))]
pub async fn create_regular_user(
    State(state): State<AppState>,
    AppJson(form): AppJson<UserForm>,
) -> Result<(StatusCode, Json<RegularUserView>), AppError> {
    trace!("Entering create_regular_user function");
    debug!("Registration attempt for username {:?}", form.username);

    let created = registration::register_regular_user(&state.db, &form).await?;
    info!("Regular user registered with ID: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a regular user
///
/// Admins may update anyone; a regular user may only update themselves.
#[utoipa::path(
    put,
    path = "/regularuser/{id}",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Regular user ID")),
    request_body = UpdateUserForm,
    responses(
        (status = 200, description = "Regular user updated", body = RegularUserView),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
        (status = 401, description = "Not allowed to update this user", body = ErrorResponse),
        (status = 404, description = "Regular user not found", body = ErrorResponse),
        (status = 409, description = "Unique field taken or record modified concurrently", body = ErrorResponse)
    )
)]
#[instrument(skip(state, form))]
pub async fn update_regular_user(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    AppJson(form): AppJson<UpdateUserForm>,
) -> Result<Json<RegularUserView>, AppError> {
    trace!("Entering update_regular_user function");
    caller.require_any(&[Role::Admin, Role::RegularUser])?;

    let updated = profile::update_regular_user(&state.db, &caller, id, &form).await?;
    info!("Regular user {} updated", id);
    Ok(Json(updated))
}

/// Add an allergen to a regular user
#[utoipa::path(
    put,
    path = "/regularuser/regularuser_id/{regularuser_id}/allergen_id/{allergen_id}",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(
        ("regularuser_id" = i32, Path, description = "Regular user ID"),
        ("allergen_id" = i32, Path, description = "Allergen ID")
    ),
    responses(
        (status = 201, description = "Allergen added", body = RegularUserView),
        (status = 401, description = "Neither an admin nor a regular user", body = ErrorResponse),
        (status = 404, description = "Regular user or allergen not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_allergen_to_regular_user(
    AppPath((regularuser_id, allergen_id)): AppPath<(i32, i32)>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RegularUserView>), AppError> {
    trace!("Entering add_allergen_to_regular_user function");
    caller.require_any(&[Role::Admin, Role::RegularUser])?;

    let updated = allergens::add_allergen(&state.db, regularuser_id, allergen_id).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

/// Remove an allergen from a regular user
///
/// Removes one matching entry. Not having the allergen is not an error.
#[utoipa::path(
    put,
    path = "/regularuser/delete/regularuser_id/{regularuser_id}/allergen_id/{allergen_id}",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(
        ("regularuser_id" = i32, Path, description = "Regular user ID"),
        ("allergen_id" = i32, Path, description = "Allergen ID")
    ),
    responses(
        (status = 201, description = "Allergen removed", body = RegularUserView),
        (status = 401, description = "Neither an admin nor a regular user", body = ErrorResponse),
        (status = 404, description = "Regular user or allergen not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_allergen_from_regular_user(
    AppPath((regularuser_id, allergen_id)): AppPath<(i32, i32)>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RegularUserView>), AppError> {
    trace!("Entering remove_allergen_from_regular_user function");
    caller.require_any(&[Role::Admin, Role::RegularUser])?;

    let updated = allergens::remove_allergen(&state.db, regularuser_id, allergen_id).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

/// Delete a regular user
///
/// The user's cookbook is kept, detached from its owner.
#[utoipa::path(
    delete,
    path = "/regularuser/{id}",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Regular user ID")),
    responses(
        (status = 200, description = "Regular user deleted", body = MessageResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Regular user not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_regular_user(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    trace!("Entering delete_regular_user function");
    caller.require_any(&[Role::Admin])?;

    lookup::delete_regular_user(&state.db, id).await?;
    info!("Regular user {} deleted by admin {}", id, caller.id);
    Ok(Json(MessageResponse {
        message: format!("Regular user with ID {} has been successfully deleted.", id),
    }))
}

/// Get a regular user by ID
#[utoipa::path(
    get,
    path = "/regularuser/{id}",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Regular user ID")),
    responses(
        (status = 200, description = "Regular user found", body = RegularUserView),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Regular user not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_user(
    AppPath(id): AppPath<i32>,
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<RegularUserView>, AppError> {
    trace!("Entering get_regular_user function");
    caller.require_any(&[Role::Admin])?;

    Ok(Json(lookup::get_regular_user(&state.db, id).await?))
}

/// Find a regular user by first name
///
/// With several matches the one registered first is returned.
#[utoipa::path(
    get,
    path = "/regularuser/by_name",
    tag = "regular-users",
    security(("basic_auth" = [])),
    params(ByNameQuery),
    responses(
        (status = 200, description = "Regular user found", body = RegularUserView),
        (status = 400, description = "Missing or empty name", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "No regular user with that name", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_user_by_name(
    Authenticated(caller): Authenticated,
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ByNameQuery>,
) -> Result<Json<RegularUserView>, AppError> {
    trace!("Entering get_regular_user_by_name function");
    caller.require_any(&[Role::Admin])?;

    Ok(Json(lookup::get_regular_user_by_name(&state.db, &query.name).await?))
}
