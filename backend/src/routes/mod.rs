//! Route definitions for the Restaurant Inventory Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - item management
        .nest("/items", item_routes())
        // Protected routes - master data
        .nest("/units", unit_routes())
        .nest("/categories", category_routes())
        .nest("/suppliers", supplier_routes())
        // Protected routes - transaction lifecycle
        .nest("/transactions", transaction_routes())
        // Protected routes - reports and dashboards
        .nest("/reports", report_routes())
        // Protected routes - notifications
        .nest("/notifications", notification_routes())
}

/// Authentication routes (public login/refresh, protected register)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(protected_auth_routes())
}

/// Auth routes that require a session
fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Item management routes (protected)
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route("/low-stock", get(handlers::list_low_stock_items))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/:item_id/movements", get(handlers::get_item_movements))
        .route("/:item_id/stock", get(handlers::get_item_stock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Unit management routes (protected)
fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_units).post(handlers::create_unit))
        .route(
            "/:unit_id",
            put(handlers::update_unit).delete(handlers::delete_unit),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category management routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier management routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Transaction lifecycle routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/:transaction_id",
            get(handlers::get_transaction).delete(handlers::delete_transaction),
        )
        .route(
            "/:transaction_id/details",
            post(handlers::add_details),
        )
        .route(
            "/details/:detail_id",
            put(handlers::update_detail).delete(handlers::delete_detail),
        )
        .route(
            "/details/:detail_id/status",
            put(handlers::update_detail_status),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(handlers::get_stock_report))
        .route("/low-stock", get(handlers::get_low_stock_report))
        .route("/pending-counts", get(handlers::get_pending_counts))
        .route("/dashboard", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/dispatch", post(handlers::dispatch_notifications))
        .route("/:notification_id/read", put(handlers::mark_notification_read))
        .route_layer(middleware::from_fn(auth_middleware))
}
