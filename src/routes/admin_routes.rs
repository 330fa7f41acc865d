use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::middleware::auth::admin_only;
use crate::models::vehicle::ApprovalStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas del super-admin (requieren rol admin)
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/vehicles/pending", get(list_pending_vehicles))
        .route("/vehicles/:id/approve", put(approve_vehicle))
        .route("/vehicles/:id/reject", put(reject_vehicle))
        .route_layer(middleware::from_fn_with_state(state, admin_only))
}

async fn list_pending_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_pending_approval().await?;
    Ok(Json(response))
}

async fn approve_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller
        .set_approval(id, ApprovalStatus::Approved)
        .await?;
    Ok(Json(response))
}

async fn reject_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller
        .set_approval(id, ApprovalStatus::Rejected)
        .await?;
    Ok(Json(response))
}
