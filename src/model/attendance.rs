use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// The three recognized work modes, each with distinct clock-in preconditions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkMode {
    Onsite,
    Remote,
    Field,
}

/// One row per clock-in event. `clock_out` stays NULL until the session is
/// closed; at most one open row may exist per user at any time.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "4f7c2d9e-0b1a-4c52-9d3f-8a6e5b4c3d2e",
        "user_id": "a1b2c3d4-e5f6-4a1b-8c2d-3e4f5a6b7c8d",
        "clock_in": "2025-03-03T00:00:00Z",
        "clock_out": null,
        "work_mode": "ONSITE",
        "location_id": "hq-seoul",
        "verified": true
    })
)]
pub struct AttendanceLog {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,
    #[schema(example = "ONSITE")]
    pub work_mode: String,
    #[schema(nullable = true)]
    pub location_id: Option<String>,
    pub verified: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
