use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    MeetingRoom,
    ZoomAccount,
    Equipment,
}

/// A bookable entity (room, Zoom account, equipment). Soft-deleted via the
/// archived flag once referenced by reservations.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Resource {
    pub id: String,
    #[schema(example = "Room Jupiter")]
    pub name: String,
    #[schema(example = "MEETING_ROOM")]
    pub resource_type: String,
    #[schema(example = 8)]
    pub capacity: i32,
    pub has_zoom: bool,
    #[schema(example = "Asia/Seoul")]
    pub timezone: String,
    #[schema(nullable = true)]
    pub metadata: Option<String>,
    pub archived: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
