//! Modelo de Booking y su máquina de estados
//!
//! Este módulo contiene el struct Booking, los enums de estado y la
//! tabla de transiciones del ciclo de vida de una reserva:
//!
//! `pending → confirmed → completed`, con `cancelled` como salida
//! desde `pending` o `confirmed`. `cancelled` y `completed` son
//! estados terminales.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Estado del pago - eje independiente del estado de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Una reserva terminal no admite más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Una reserva activa cuenta para el chequeo de conflictos de fechas
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Tabla de transiciones del ciclo de vida.
    ///
    /// Volver a `pending` está prohibido desde cualquier estado.
    pub fn can_transition_to(&self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    /// Nuevo valor de `vehicle.is_available` tras una transición, si cambia.
    ///
    /// `confirmed → cancelled` restaura la disponibilidad: la fuente
    /// original dejaba el vehículo como no disponible indefinidamente
    /// (ver DESIGN.md).
    pub fn availability_after(&self, to: BookingStatus) -> Option<bool> {
        use BookingStatus::*;
        match (self, to) {
            (Pending, Confirmed) => Some(false),
            (Confirmed, Completed) => Some(true),
            (Confirmed, Cancelled) => Some(true),
            _ => None,
        }
    }
}

/// Booking principal - mapea exactamente a la tabla bookings.
///
/// `owner_id` está desnormalizado desde el vehículo para autorizar
/// transiciones sin un join adicional.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub owner_id: Uuid,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub total_amount: Decimal,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;
    use super::*;

    const ALL: [BookingStatus; 4] = [Pending, Confirmed, Cancelled, Completed];

    #[test]
    fn happy_path_transitions_are_allowed() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_escapes_are_allowed() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        for from in [Cancelled, Completed] {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{:?} -> {:?} should be forbidden",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn pending_cannot_be_reentered() {
        for from in ALL {
            assert!(!from.can_transition_to(Pending));
        }
    }

    #[test]
    fn confirm_flips_vehicle_to_unavailable() {
        assert_eq!(Pending.availability_after(Confirmed), Some(false));
    }

    #[test]
    fn complete_restores_availability() {
        assert_eq!(Confirmed.availability_after(Completed), Some(true));
    }

    #[test]
    fn cancel_after_confirm_restores_availability() {
        assert_eq!(Confirmed.availability_after(Cancelled), Some(true));
    }

    #[test]
    fn cancel_while_pending_leaves_availability_alone() {
        assert_eq!(Pending.availability_after(Cancelled), None);
    }

    #[test]
    fn only_pending_and_confirmed_are_active() {
        assert!(Pending.is_active());
        assert!(Confirmed.is_active());
        assert!(!Cancelled.is_active());
        assert!(!Completed.is_active());
    }

    #[test]
    fn status_parse_round_trip() {
        for status in ALL {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("approved"), None);
    }
}
