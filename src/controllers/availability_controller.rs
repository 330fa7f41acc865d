//! Controller del calendario de bloqueos
//!
//! Bloqueo y desbloqueo manual de fechas por parte del propietario.
//! Estas operaciones no tocan `is_available`: ese flag lo gobierna
//! únicamente la máquina de estados de las reservas.

use crate::dto::availability_dto::{
    BlockDatesRequest, BlockedPeriodResponse, UnblockDatesRequest,
};
use crate::dto::common::ApiResponse;
use crate::models::vehicle::{ApprovalStatus, BlockReason, Vehicle};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability::validate_block_range;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AvailabilityController {
    repository: VehicleRepository,
}

impl AvailabilityController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    async fn owned_vehicle(&self, vehicle_id: Uuid, owner_id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self
            .repository
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if vehicle.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Vehicle does not belong to this owner".to_string(),
            ));
        }

        Ok(vehicle)
    }

    pub async fn block_dates(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        request: BlockDatesRequest,
    ) -> Result<ApiResponse<BlockedPeriodResponse>, AppError> {
        let vehicle = self.owned_vehicle(vehicle_id, owner_id).await?;

        // Solo un vehículo aprobado tiene calendario que bloquear
        if vehicle.approval_status != ApprovalStatus::Approved {
            return Err(AppError::Forbidden(
                "Vehicle is not approved yet".to_string(),
            ));
        }

        let reason = BlockReason::parse(&request.reason).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid reason '{}': expected 'booked', 'maintenance' or 'owner_blocked'",
                request.reason
            ))
        })?;

        let today = chrono::Utc::now().date_naive();
        let range = validate_block_range(request.start_date, request.end_date, today)?;

        let period = self
            .repository
            .insert_blocked_period_checked(vehicle.id, range, reason)
            .await?;

        Ok(ApiResponse::success_with_message(
            period.into(),
            "Dates blocked".to_string(),
        ))
    }

    pub async fn unblock_dates(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        request: UnblockDatesRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let vehicle = self.owned_vehicle(vehicle_id, owner_id).await?;

        self.repository
            .delete_blocked_period_exact(vehicle.id, request.start_date, request.end_date)
            .await?;

        Ok(ApiResponse::success_with_message(
            (),
            "Dates unblocked".to_string(),
        ))
    }

    pub async fn list_blocked(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<Vec<BlockedPeriodResponse>, AppError> {
        let vehicle = self.owned_vehicle(vehicle_id, owner_id).await?;

        let periods = self.repository.list_blocked_periods(vehicle.id).await?;
        Ok(periods.into_iter().map(Into::into).collect())
    }
}
