//! Controller de reservas del lado del cliente
//!
//! Crea reservas (previa validación de rango y chequeo de conflictos)
//! y permite cancelarlas mientras sigan activas.

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest};
use crate::dto::common::ApiResponse;
use crate::models::booking::BookingStatus;
use crate::models::vehicle::ApprovalStatus;
use crate::repositories::booking_repository::{BookingRepository, NewBooking};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability::DateRange;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct BookingController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        request.validate()?;

        let range = DateRange::new(request.pickup_date, request.dropoff_date)?;

        // Integridad referencial a nivel de aplicación: el vehículo debe
        // existir y estar aprobado antes de aceptar la reserva.
        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if vehicle.approval_status != ApprovalStatus::Approved {
            return Err(AppError::BadRequest(
                "Vehicle is not approved for booking".to_string(),
            ));
        }

        let booking = self
            .bookings
            .create_checked(NewBooking {
                customer_id,
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                range,
                pickup_location: request.pickup_location,
                dropoff_location: request.dropoff_location,
                total_amount: request.total_amount,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Booking created, awaiting owner confirmation".to_string(),
        ))
    }

    pub async fn list(&self, customer_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.bookings.find_by_customer(customer_id).await?;
        Ok(bookings.into_iter().map(Into::into).collect())
    }

    /// El cliente puede cancelar su reserva mientras esté `pending` o
    /// `confirmed`; los estados terminales no admiten cancelación.
    pub async fn cancel(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.customer_id != customer_id {
            return Err(AppError::Forbidden(
                "Booking does not belong to this customer".to_string(),
            ));
        }

        if !booking
            .booking_status
            .can_transition_to(BookingStatus::Cancelled)
        {
            return Err(AppError::InvalidTransition(format!(
                "Cannot cancel a booking in state '{}'",
                booking.booking_status.as_str()
            )));
        }

        let updated = self
            .bookings
            .apply_transition(&booking, BookingStatus::Cancelled)
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Booking cancelled".to_string(),
        ))
    }
}
