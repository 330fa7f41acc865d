use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{VehicleFilters, VehicleResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas de búsqueda de vehículos (solo aprobados)
pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_vehicles))
        .route("/:id", get(get_vehicle))
}

async fn search_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.search(filters).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_public(id).await?;
    Ok(Json(response))
}
