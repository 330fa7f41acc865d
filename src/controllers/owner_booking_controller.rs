//! Controller de reservas del lado del propietario
//!
//! Autoridad de transición de estados: solo el propietario del vehículo
//! puede confirmar, cancelar o completar una reserva, y cada transición
//! pasa por la tabla de la máquina de estados antes de aplicarse.

use crate::dto::booking_dto::BookingResponse;
use crate::dto::common::ApiResponse;
use crate::models::booking::{Booking, BookingStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct OwnerBookingController {
    repository: BookingRepository,
}

impl OwnerBookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool),
        }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.repository.find_by_owner(owner_id).await?;
        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn transition(
        &self,
        owner_id: Uuid,
        booking_id: Uuid,
        status: &str,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let booking = self
            .repository
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        let target = authorize_transition(&booking, owner_id, status)?;

        let updated = self.repository.apply_transition(&booking, target).await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            format!("Booking {}", target.as_str()),
        ))
    }
}

/// Decide si `owner_id` puede mover la reserva al estado pedido.
///
/// El token de estado debe existir, la reserva debe pertenecer al
/// propietario y la transición debe estar en la tabla del ciclo de
/// vida. Volver a `pending` cae por la tabla misma. No toca la base
/// de datos.
fn authorize_transition(
    booking: &Booking,
    owner_id: Uuid,
    status: &str,
) -> Result<BookingStatus, AppError> {
    let target = BookingStatus::parse(status).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid status '{}': expected 'confirmed', 'cancelled' or 'completed'",
            status
        ))
    })?;

    if booking.owner_id != owner_id {
        return Err(AppError::Forbidden(
            "Booking does not belong to this owner".to_string(),
        ));
    }

    if !booking.booking_status.can_transition_to(target) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot move booking from '{}' to '{}'",
            booking.booking_status.as_str(),
            target.as_str()
        )));
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::PaymentStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn booking_owned_by(owner_id: Uuid, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            owner_id,
            pickup_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            dropoff_date: NaiveDate::from_ymd_opt(2030, 6, 5).unwrap(),
            pickup_location: "Madrid".to_string(),
            dropoff_location: "Madrid".to_string(),
            total_amount: Decimal::new(20000, 2),
            booking_status: status,
            payment_status: PaymentStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_can_confirm_pending_booking() {
        let owner = Uuid::new_v4();
        let booking = booking_owned_by(owner, BookingStatus::Pending);

        let target = authorize_transition(&booking, owner, "confirmed").unwrap();
        assert_eq!(target, BookingStatus::Confirmed);
    }

    #[test]
    fn foreign_owner_cannot_confirm_booking() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let booking = booking_owned_by(owner, BookingStatus::Pending);

        let result = authorize_transition(&booking, stranger, "confirmed");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        // La reserva no ha cambiado
        assert_eq!(booking.booking_status, BookingStatus::Pending);
    }

    #[test]
    fn booking_cannot_be_set_back_to_pending() {
        let owner = Uuid::new_v4();
        let booking = booking_owned_by(owner, BookingStatus::Confirmed);

        let result = authorize_transition(&booking, owner, "pending");
        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn terminal_booking_rejects_transitions() {
        let owner = Uuid::new_v4();
        let booking = booking_owned_by(owner, BookingStatus::Cancelled);

        let result = authorize_transition(&booking, owner, "completed");
        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn unknown_status_token_is_rejected() {
        let owner = Uuid::new_v4();
        let booking = booking_owned_by(owner, BookingStatus::Pending);

        let result = authorize_transition(&booking, owner, "approved");
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
