use crate::handlers::{
    allergens::{create_allergen, get_allergen, get_allergens},
    chefs::{create_chef, delete_chef, get_chef, get_chef_recipes, get_chefs, update_chef},
    health::health_check,
    recipes::{create_recipe, get_recipe_by_name},
    regular_users::{
        add_allergen_to_regular_user, create_regular_user, delete_regular_user, get_regular_user,
        get_regular_user_by_name, get_regular_users, remove_allergen_from_regular_user,
        update_regular_user,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Regular users
        .route("/regularuser", get(get_regular_users))
        .route("/regularuser", post(create_regular_user))
        .route("/regularuser/by_name", get(get_regular_user_by_name))
        .route("/regularuser/:id", get(get_regular_user))
        .route("/regularuser/:id", put(update_regular_user))
        .route("/regularuser/:id", delete(delete_regular_user))
        .route(
            "/regularuser/regularuser_id/:regularuser_id/allergen_id/:allergen_id",
            put(add_allergen_to_regular_user),
        )
        .route(
            "/regularuser/delete/regularuser_id/:regularuser_id/allergen_id/:allergen_id",
            put(remove_allergen_from_regular_user),
        )
        // Chefs
        .route("/chef", get(get_chefs))
        .route("/chef", post(create_chef))
        .route("/chef/:id", get(get_chef))
        .route("/chef/:id", put(update_chef))
        .route("/chef/:id", delete(delete_chef))
        .route("/chef/:id/recipes", get(get_chef_recipes))
        // Allergens
        .route("/allergens", get(get_allergens))
        .route("/allergens", post(create_allergen))
        .route("/allergens/:id", get(get_allergen))
        // Recipes
        .route("/recipe", post(create_recipe))
        .route("/recipe/by_name", get(get_recipe_by_name))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
