//! Route definitions for the Hospitality School Management Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login/refresh, protected session info)
        .nest("/auth", auth_routes())
        // Protected routes - supplier management
        .nest("/suppliers", supplier_routes())
        // Protected routes - ingredient management
        .nest("/ingredients", ingredient_routes())
        // Protected routes - recipe management
        .nest("/recipes", recipe_routes())
        // Protected routes - class management
        .nest("/classes", class_routes())
        // Protected routes - student management
        .nest("/students", student_routes())
        // Protected routes - staff account administration
        .nest("/users", user_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        // Session routes (protected)
        .merge(session_routes())
}

/// Current session routes (protected)
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier management routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Ingredient management routes (protected)
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_ingredients).post(handlers::create_ingredient))
        .route(
            "/:ingredient_id",
            get(handlers::get_ingredient)
                .put(handlers::update_ingredient)
                .delete(handlers::delete_ingredient),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Recipe management routes (protected)
fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_recipes).post(handlers::create_recipe))
        .route(
            "/:recipe_id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/:recipe_id/ingredients", post(handlers::add_recipe_ingredient))
        .route(
            "/:recipe_id/ingredients/:line_id",
            put(handlers::update_recipe_ingredient).delete(handlers::remove_recipe_ingredient),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Class management routes (protected)
fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_classes).post(handlers::create_class))
        .route(
            "/:class_id",
            get(handlers::get_class)
                .put(handlers::update_class)
                .delete(handlers::delete_class),
        )
        .route("/:class_id/recipes", post(handlers::assign_recipe))
        .route("/:class_id/recipes/:recipe_id", delete(handlers::unassign_recipe))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Student management routes (protected)
fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_students).post(handlers::create_student))
        .route(
            "/:student_id",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Staff account routes (protected, admin checks inside the handlers)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/recipes/:recipe_id", get(handlers::get_recipe_cost_report))
        .route("/classes/:class_id", get(handlers::get_class_cost_report))
        .route_layer(middleware::from_fn(auth_middleware))
}
