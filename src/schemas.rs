use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};
use validator::Validate;
use workflow::validation::{AllergenForm, RecipeForm, UpdateChefForm, UpdateUserForm, UserForm};
use workflow::views::{AllergenView, ChefView, RecipeView, RegularUserView};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Error payload returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code
    pub code: i32,
    /// Human readable error message
    pub message: String,
    /// Field errors, present for validation failures only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Query parameters for lookups by name
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ByNameQuery {
    /// Exact name to look for
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Registers HTTP Basic authentication in the OpenAPI document
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::regular_users::get_regular_users,
        crate::handlers::regular_users::create_regular_user,
        crate::handlers::regular_users::get_regular_user,
        crate::handlers::regular_users::get_regular_user_by_name,
        crate::handlers::regular_users::update_regular_user,
        crate::handlers::regular_users::delete_regular_user,
        crate::handlers::regular_users::add_allergen_to_regular_user,
        crate::handlers::regular_users::remove_allergen_from_regular_user,
        crate::handlers::chefs::get_chefs,
        crate::handlers::chefs::create_chef,
        crate::handlers::chefs::get_chef,
        crate::handlers::chefs::update_chef,
        crate::handlers::chefs::delete_chef,
        crate::handlers::chefs::get_chef_recipes,
        crate::handlers::allergens::get_allergens,
        crate::handlers::allergens::get_allergen,
        crate::handlers::allergens::create_allergen,
        crate::handlers::recipes::create_recipe,
        crate::handlers::recipes::get_recipe_by_name,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            ByNameQuery,
            UserForm,
            UpdateUserForm,
            UpdateChefForm,
            AllergenForm,
            RecipeForm,
            RegularUserView,
            ChefView,
            AllergenView,
            RecipeView,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "regular-users", description = "Regular user registration, profiles and allergens"),
        (name = "chefs", description = "Chef management"),
        (name = "allergens", description = "Allergen reference data"),
        (name = "recipes", description = "Recipes published by chefs"),
    ),
    info(
        title = "Cookbook API",
        description = "Recipe and cookbook backend with role-based user management",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
