//! Repositorio de vehículos y de su calendario de bloqueos
//!
//! El bloqueo de fechas corre dentro de una transacción con
//! `SELECT ... FOR UPDATE` sobre la fila del vehículo, de modo que dos
//! peticiones concurrentes sobre el mismo vehículo no puedan pasar
//! ambas el chequeo de solapamiento antes de escribir.

use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::vehicle::{ApprovalStatus, BlockReason, BlockedPeriod, Vehicle};
use crate::services::availability::{ensure_no_conflict, DateRange};
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        license_plate: String,
        brand: String,
        model: String,
        price_per_day: Decimal,
    ) -> Result<Vehicle, AppError> {
        let id = Uuid::new_v4();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, owner_id, license_plate, brand, model, price_per_day, approval_status, is_available, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', TRUE, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(license_plate)
        .bind(brand)
        .bind(model)
        .bind(price_per_day)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Búsqueda pública: solo vehículos aprobados
    pub async fn search_approved(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE approval_status = 'approved'
              AND ($1::text IS NULL OR brand ILIKE $1)
              AND ($2::numeric IS NULL OR price_per_day <= $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.brand.as_ref().map(|b| format!("%{}%", b)))
        .bind(filters.max_price)
        .bind(filters.limit.unwrap_or(50))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_pending_approval(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE approval_status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn license_plate_exists(&self, license_plate: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1)")
                .bind(license_plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        license_plate: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        price_per_day: Option<Decimal>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if current.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Vehicle does not belong to this owner".to_string(),
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET license_plate = $2, brand = $3, model = $4, price_per_day = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(license_plate.unwrap_or(current.license_plate))
        .bind(brand.unwrap_or(current.brand))
        .bind(model.unwrap_or(current.model))
        .bind(price_per_day.unwrap_or(current.price_per_day))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if vehicle.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Vehicle does not belong to this owner".to_string(),
            ));
        }

        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_approval_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET approval_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn list_blocked_periods(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<BlockedPeriod>, AppError> {
        let periods = sqlx::query_as::<_, BlockedPeriod>(
            "SELECT * FROM blocked_periods WHERE vehicle_id = $1 ORDER BY start_date",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(periods)
    }

    /// Inserta un periodo bloqueado tras verificar que no solapa con los
    /// existentes. Chequeo e inserción corren en la misma transacción,
    /// serializados por el lock de la fila del vehículo.
    pub async fn insert_blocked_period_checked(
        &self,
        vehicle_id: Uuid,
        range: DateRange,
        reason: BlockReason,
    ) -> Result<BlockedPeriod, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let existing: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            "SELECT start_date, end_date FROM blocked_periods WHERE vehicle_id = $1",
        )
        .bind(vehicle_id)
        .fetch_all(&mut *tx)
        .await?;

        let existing_ranges: Vec<DateRange> = existing
            .into_iter()
            .map(|(start, end)| DateRange { start, end })
            .collect();

        ensure_no_conflict(&range, existing_ranges.iter())?;

        let period = sqlx::query_as::<_, BlockedPeriod>(
            r#"
            INSERT INTO blocked_periods (id, vehicle_id, start_date, end_date, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(range.start)
        .bind(range.end)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(period)
    }

    /// Elimina el periodo cuyo start y end coinciden exactamente.
    /// Sin match exacto no se desbloquea nada (no hay desbloqueo parcial).
    pub async fn delete_blocked_period_exact(
        &self,
        vehicle_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM blocked_periods WHERE vehicle_id = $1 AND start_date = $2 AND end_date = $3",
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No blocked period from {} to {} on this vehicle",
                start_date, end_date
            )));
        }

        Ok(())
    }
}
