use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recipe catalog
        .route("/recipes", get(handlers::get_recipes))
        .route("/recipes", post(handlers::publish_recipe))
        .route("/recipes/:id", get(handlers::get_recipe))
        .route("/recipes/:id/substitutions", get(handlers::get_substitutions))
        // Global substitution rules
        .route("/substitutions", post(handlers::publish_rule))
        // Inventory
        .route("/inventory", get(handlers::get_inventory))
        .route("/inventory/ingredients", post(handlers::add_inventory_ingredient))
        .route(
            "/inventory/ingredients/:name",
            delete(handlers::remove_inventory_ingredient),
        )
        .route("/inventory/tools", post(handlers::add_inventory_tool))
        .route("/inventory/tools/:name", delete(handlers::remove_inventory_tool))
        .route("/inventory/exclusions", post(handlers::add_exclusion))
        .route("/inventory/exclusions/:name", delete(handlers::remove_exclusion))
        // Matching
        .route("/match", get(handlers::match_all))
        .route("/match/:id", get(handlers::match_one))
        // Shopping list
        .route("/shopping-list", get(handlers::get_shopping_list))
        .route(
            "/shopping-list/recipes/:id",
            post(handlers::add_recipe_to_shopping_list),
        )
        .route(
            "/shopping-list/recipes/:id",
            delete(handlers::remove_recipe_from_shopping_list),
        )
        .route("/shopping-list/manual", post(handlers::add_manual_entry))
        .route("/shopping-list/manual/:name", delete(handlers::remove_manual_entry))
        .route(
            "/shopping-list/entries/:name/toggle",
            post(handlers::toggle_entry_completed),
        )
        .route(
            "/shopping-list/clear-completed",
            post(handlers::clear_completed_entries),
        )
        .with_state(state)
}
