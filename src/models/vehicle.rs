//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, los periodos bloqueados del
//! calendario y sus enums. Mapea exactamente al schema PostgreSQL.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de aprobación del vehículo - mapea al ENUM approval_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Motivo de bloqueo de fechas - mapea al ENUM block_reason
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "block_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Booked,
    Maintenance,
    OwnerBlocked,
}

impl BlockReason {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "booked" => Some(BlockReason::Booked),
            "maintenance" => Some(BlockReason::Maintenance),
            "owner_blocked" => Some(BlockReason::OwnerBlocked),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub price_per_day: Decimal,
    pub approval_status: ApprovalStatus,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Periodo bloqueado del calendario de un vehículo.
///
/// El rango es semiabierto `[start_date, end_date)`: el día de fin
/// queda libre para el siguiente alquiler.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockedPeriod {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: BlockReason,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_reason_parse_accepts_known_values() {
        assert_eq!(BlockReason::parse("booked"), Some(BlockReason::Booked));
        assert_eq!(
            BlockReason::parse("owner_blocked"),
            Some(BlockReason::OwnerBlocked)
        );
        assert_eq!(BlockReason::parse("vacation"), None);
    }
}
