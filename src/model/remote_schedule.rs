use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Pending,
    Approved,
    Denied,
}

/// A remote-work day request. At most one non-archived row per (user, date);
/// cancellation archives the row rather than deleting it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RemoteSchedule {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String, format = "date", example = "2025-03-03")]
    pub work_date: NaiveDate,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub reason: Option<String>,
    pub archived: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
