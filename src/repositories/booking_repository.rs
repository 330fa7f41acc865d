//! Repositorio de reservas
//!
//! La creación de una reserva hace el chequeo de conflictos y el INSERT
//! dentro de una sola transacción, con `SELECT ... FOR UPDATE` sobre la
//! fila del vehículo. La fuente original tenía una carrera
//! read-then-write entre el chequeo y la escritura; aquí queda cerrada
//! (ver DESIGN.md).

use crate::models::booking::{Booking, BookingStatus};
use crate::services::availability::{ensure_no_conflict, DateRange};
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct BookingRepository {
    pool: PgPool,
}

pub struct NewBooking {
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub owner_id: Uuid,
    pub range: DateRange,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub total_amount: Decimal,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea una reserva en estado `pending` si el rango no solapa ni con
    /// las reservas activas del vehículo ni con sus periodos bloqueados.
    pub async fn create_checked(&self, new: NewBooking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock de la fila del vehículo: serializa reservas concurrentes
        // sobre el mismo vehículo.
        sqlx::query("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(new.vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let booked: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT pickup_date, dropoff_date FROM bookings
            WHERE vehicle_id = $1 AND booking_status IN ('pending', 'confirmed')
            "#,
        )
        .bind(new.vehicle_id)
        .fetch_all(&mut *tx)
        .await?;

        let blocked: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            "SELECT start_date, end_date FROM blocked_periods WHERE vehicle_id = $1",
        )
        .bind(new.vehicle_id)
        .fetch_all(&mut *tx)
        .await?;

        let existing: Vec<DateRange> = booked
            .into_iter()
            .chain(blocked)
            .map(|(start, end)| DateRange { start, end })
            .collect();

        ensure_no_conflict(&new.range, existing.iter())?;

        let now = Utc::now();
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, customer_id, vehicle_id, owner_id,
                pickup_date, dropoff_date, pickup_location, dropoff_location,
                total_amount, booking_status, payment_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', 'pending', $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.customer_id)
        .bind(new.vehicle_id)
        .bind(new.owner_id)
        .bind(new.range.start)
        .bind(new.range.end)
        .bind(new.pickup_location)
        .bind(new.dropoff_location)
        .bind(new.total_amount)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Aplica una transición ya autorizada: actualiza el estado de la
    /// reserva y, si la transición lo exige, el flag `is_available` del
    /// vehículo, en la misma transacción.
    pub async fn apply_transition(
        &self,
        booking: &Booking,
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET booking_status = $2, updated_at = $3
            WHERE id = $1 AND booking_status = $4
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(to)
        .bind(Utc::now())
        // Guard contra transiciones concurrentes sobre la misma reserva
        .bind(booking.booking_status)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "booking is no longer in state '{}'",
                booking.booking_status.as_str()
            ))
        })?;

        if let Some(is_available) = booking.booking_status.availability_after(to) {
            sqlx::query("UPDATE vehicles SET is_available = $2 WHERE id = $1")
                .bind(booking.vehicle_id)
                .bind(is_available)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }
}
