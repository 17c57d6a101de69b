use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

/// Per-user-per-year allowance for one leave type. `used_days` never exceeds
/// `allowance_days` after a successful approval.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    pub id: String,
    pub user_id: String,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = 15)]
    pub allowance_days: i32,
    #[schema(example = 3)]
    pub used_days: i32,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

/// A leave request over an inclusive calendar-date range. Approval debits the
/// matching balance by business-day count; reversing an approval credits the
/// same count back.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: String,
    pub user_id: String,
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(value_type = String, format = "date", example = "2025-03-03")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2025-03-07")]
    pub end_date: NaiveDate,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub reason: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
