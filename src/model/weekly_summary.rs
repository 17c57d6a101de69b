use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-user-per-ISO-week accumulator of worked minutes. Created lazily on the
/// first clock-out of the week and only ever incremented.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "7e1f3a5c-9b2d-4e6f-8a0c-1d3e5f7a9b0c",
        "user_id": "a1b2c3d4-e5f6-4a1b-8c2d-3e4f5a6b7c8d",
        "week_start": "2025-03-03",
        "total_minutes": 2430,
        "overtime_minutes": 0,
        "exceeds_limit": false
    })
)]
pub struct WeeklySummary {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String, format = "date")]
    pub week_start: NaiveDate,
    pub total_minutes: i64,
    pub overtime_minutes: i64,
    pub exceeds_limit: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
