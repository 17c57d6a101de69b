use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A booking of a shared resource over the half-open interval
/// [starts_at, ends_at). Cancelled rows no longer participate in conflict
/// checks; `attendees` is a JSON array column.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Reservation {
    pub id: String,
    pub resource_id: String,
    pub organizer_id: String,
    #[schema(value_type = String, format = "date-time")]
    pub starts_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub ends_at: DateTime<Utc>,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub agenda: Option<String>,
    #[schema(example = "[\"kim\",\"lee\"]")]
    pub attendees: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn attendees(&self) -> Vec<String> {
        serde_json::from_str(&self.attendees).unwrap_or_default()
    }

    /// A reservation blocks the slot unless it has been cancelled.
    pub fn blocks_slot(&self) -> bool {
        self.status != ReservationStatus::Cancelled.as_ref()
    }
}
