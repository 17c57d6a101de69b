use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attendance::WorkMode;

/// A geofenced office. `allowed_modes` is stored as a JSON array column;
/// the typed accessor keeps that a persistence detail.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkLocation {
    pub id: String,
    #[schema(example = "Seoul HQ")]
    pub name: String,
    #[schema(example = 37.5665)]
    pub latitude: f64,
    #[schema(example = 126.978)]
    pub longitude: f64,
    #[schema(example = 100.0)]
    pub radius_meters: f64,
    #[schema(example = "[\"ONSITE\"]")]
    pub allowed_modes: String,
    pub archived: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl WorkLocation {
    /// Work modes permitted at this location. Malformed stored JSON yields
    /// an empty set rather than an error.
    pub fn allowed_modes(&self) -> Vec<WorkMode> {
        serde_json::from_str(&self.allowed_modes).unwrap_or_default()
    }
}
