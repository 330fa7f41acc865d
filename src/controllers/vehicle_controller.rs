use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters, VehicleResponse,
};
use crate::models::vehicle::ApprovalStatus;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        // Verificar que la matrícula no exista
        if self
            .repository
            .license_plate_exists(&request.license_plate)
            .await?
        {
            return Err(AppError::Conflict(
                "A vehicle with this license plate is already registered".to_string(),
            ));
        }

        // El vehículo queda pendiente de aprobación por el admin
        let vehicle = self
            .repository
            .create(
                owner_id,
                request.license_plate,
                request.brand,
                request.model,
                request.price_per_day,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle registered, awaiting approval".to_string(),
        ))
    }

    pub async fn get_public(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .filter(|v| v.approval_status == ApprovalStatus::Approved)
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn search(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.search_approved(&filters).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_by_owner(owner_id).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .repository
            .update(
                id,
                owner_id,
                request.license_plate,
                request.brand,
                request.model,
                request.price_per_day,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, owner_id).await?;
        Ok(())
    }

    pub async fn list_pending_approval(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_pending_approval().await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn set_approval(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle = self.repository.set_approval_status(id, status).await?;

        let message = match status {
            ApprovalStatus::Approved => "Vehicle approved",
            ApprovalStatus::Rejected => "Vehicle rejected",
            ApprovalStatus::Pending => "Vehicle set back to pending",
        };

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            message.to_string(),
        ))
    }
}
