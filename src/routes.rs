//! Route registration
//! Builds the API router and applies middleware layers

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{handlers, middleware::AppState};

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public endpoints (probes)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // Authenticated API
    let api_routes = Router::new()
        // Caller's own permission data (menus, client-side guards)
        .route("/api/v1/me/permissions", get(handlers::permission::get_my_permissions))

        // Catalogs for the admin assignment form
        .route(
            "/api/v1/permission-levels",
            get(handlers::permission::list_permission_levels),
        )
        .route("/api/v1/screens", get(handlers::permission::list_screens))

        // Screen permission store, scoped by level
        .route(
            "/api/v1/screen-permissions",
            get(handlers::permission::list_screen_permissions),
        )

        // Assignment flow
        .route(
            "/api/v1/employees/{id}/permissions",
            get(handlers::permission::get_employee_permissions)
                .put(handlers::permission::assign_employee_permissions),
        )

        // Employee registry
        .route(
            "/api/v1/employees",
            get(handlers::employee::list_employees).post(handlers::employee::create_employee),
        )
        .route(
            "/api/v1/employees/{id}",
            get(handlers::employee::get_employee)
                .put(handlers::employee::update_employee)
                .delete(handlers::employee::delete_employee),
        )

        // Audit trail
        .route("/api/v1/audit/logs", get(handlers::audit::list_audit_logs))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // The admin frontend is a separate SPA origin
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}
