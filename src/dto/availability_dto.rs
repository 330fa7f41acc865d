use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::{BlockReason, BlockedPeriod};

// Request para bloquear fechas del calendario de un vehículo
#[derive(Debug, Deserialize)]
pub struct BlockDatesRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    // booked | maintenance | owner_blocked
    pub reason: String,
}

// Request para desbloquear fechas (match exacto de start y end)
#[derive(Debug, Deserialize)]
pub struct UnblockDatesRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Response de periodo bloqueado
#[derive(Debug, Serialize)]
pub struct BlockedPeriodResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: BlockReason,
    pub created_at: DateTime<Utc>,
}

impl From<BlockedPeriod> for BlockedPeriodResponse {
    fn from(period: BlockedPeriod) -> Self {
        Self {
            id: period.id,
            vehicle_id: period.vehicle_id,
            start_date: period.start_date,
            end_date: period.end_date,
            reason: period.reason,
            created_at: period.created_at,
        }
    }
}
