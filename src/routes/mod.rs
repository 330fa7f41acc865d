use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::state::AppState;

pub mod admin_routes;
pub mod auth_routes;
pub mod booking_routes;
pub mod owner_routes;
pub mod vehicle_routes;

/// Router completo de la API con el estado ya aplicado.
/// Lo usan tanto `main` como los tests de integración.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest(
            "/api/bookings",
            booking_routes::create_booking_router(state.clone()),
        )
        .nest("/api/owner", owner_routes::create_owner_router(state.clone()))
        .nest("/api/admin", admin_routes::create_admin_router(state.clone()))
        .with_state(state)
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "rental-marketplace",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
