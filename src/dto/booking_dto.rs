use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{Booking, BookingStatus, PaymentStatus};

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,

    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,

    #[validate(length(min = 2, max = 200))]
    pub pickup_location: String,

    #[validate(length(min = 2, max = 200))]
    pub dropoff_location: String,

    // Calculado por el caller, no por este backend
    pub total_amount: Decimal,
}

// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct BookingResponse {
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

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            owner_id: booking.owner_id,
            pickup_date: booking.pickup_date,
            dropoff_date: booking.dropoff_date,
            pickup_location: booking.pickup_location,
            dropoff_location: booking.dropoff_location,
            total_amount: booking.total_amount,
            booking_status: booking.booking_status,
            payment_status: booking.payment_status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
