use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::availability_controller::AvailabilityController;
use crate::controllers::owner_booking_controller::OwnerBookingController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::availability_dto::{
    BlockDatesRequest, BlockedPeriodResponse, UnblockDatesRequest,
};
use crate::dto::booking_dto::BookingResponse;
use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::middleware::auth::{owner_only, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas del propietario (requieren rol owner)
pub fn create_owner_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/vehicles", post(create_vehicle))
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/:id", put(update_vehicle))
        .route("/vehicles/:id", delete(delete_vehicle))
        .route("/vehicles/:id/block-dates", post(block_dates))
        .route("/vehicles/:id/block-dates", delete(unblock_dates))
        .route("/vehicles/:id/block-dates", get(list_blocked_dates))
        .route("/bookings", get(list_bookings))
        .route("/bookings/:booking_id/:status", put(transition_booking))
        .route_layer(middleware::from_fn_with_state(state, owner_only))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_owner(user.user_id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Vehicle deleted successfully"
    })))
}

async fn block_dates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<BlockDatesRequest>,
) -> Result<Json<ApiResponse<BlockedPeriodResponse>>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let response = controller.block_dates(user.user_id, id, request).await?;
    Ok(Json(response))
}

async fn unblock_dates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UnblockDatesRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let response = controller.unblock_dates(user.user_id, id, request).await?;
    Ok(Json(response))
}

async fn list_blocked_dates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BlockedPeriodResponse>>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let response = controller.list_blocked(user.user_id, id).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = OwnerBookingController::new(state.pool.clone());
    let response = controller.list(user.user_id).await?;
    Ok(Json(response))
}

async fn transition_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((booking_id, status)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = OwnerBookingController::new(state.pool.clone());
    let response = controller
        .transition(user.user_id, booking_id, &status)
        .await?;
    Ok(Json(response))
}
