use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::attendance::WorkMode;
use crate::model::work_location::WorkLocation;
use crate::utils::location_cache;

#[derive(Deserialize, ToSchema)]
pub struct CreateWorkLocation {
    #[schema(example = "Seoul HQ")]
    pub name: String,
    #[schema(example = 37.5665)]
    pub latitude: f64,
    #[schema(example = 126.978)]
    pub longitude: f64,
    #[schema(example = 100.0)]
    pub radius_meters: f64,
    #[schema(example = json!(["ONSITE"]))]
    pub allowed_modes: Vec<WorkMode>,
}

/// Register a geofenced work location (admin).
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = CreateWorkLocation,
    responses(
        (status = 201, description = "Location created", body = WorkLocation),
        (status = 400, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Locations"
)]
pub async fn create_location(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateWorkLocation>,
) -> Result<HttpResponse, EngineError> {
    if payload.name.trim().is_empty() {
        return Err(EngineError::Validation("name is required".into()));
    }
    if !payload.latitude.is_finite() || !payload.longitude.is_finite() {
        return Err(EngineError::Validation(
            "latitude and longitude must be finite numbers".into(),
        ));
    }
    if !(payload.radius_meters.is_finite() && payload.radius_meters > 0.0) {
        return Err(EngineError::Validation(
            "radius_meters must be a positive number".into(),
        ));
    }

    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let allowed_modes = serde_json::to_string(&payload.allowed_modes)?;

    sqlx::query(
        r#"
        INSERT INTO work_locations
            (id, name, latitude, longitude, radius_meters, allowed_modes, archived, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(payload.name.trim())
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.radius_meters)
    .bind(allowed_modes)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let location = sqlx::query_as::<_, WorkLocation>("SELECT * FROM work_locations WHERE id = ?")
        .bind(&id)
        .fetch_one(pool.get_ref())
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "location": location })))
}

/// List active work locations.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Work locations", body = [WorkLocation]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Locations"
)]
pub async fn list_locations(pool: web::Data<MySqlPool>) -> Result<HttpResponse, EngineError> {
    let locations: Vec<WorkLocation> =
        sqlx::query_as("SELECT * FROM work_locations WHERE archived = 0 ORDER BY name ASC")
            .fetch_all(pool.get_ref())
            .await?;

    // The allowed_modes column is JSON text; callers get a typed array.
    let locations: Vec<_> = locations
        .iter()
        .map(|loc| {
            serde_json::json!({
                "id": loc.id,
                "name": loc.name,
                "latitude": loc.latitude,
                "longitude": loc.longitude,
                "radius_meters": loc.radius_meters,
                "allowed_modes": loc.allowed_modes(),
                "created_at": loc.created_at,
                "updated_at": loc.updated_at,
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "locations": locations })))
}

/// Archive a work location. Referenced locations are never hard-deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    params(("id" = String, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location archived"),
        (status = 404, description = "Location not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Locations"
)]
pub async fn archive_location(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let now = Utc::now();

    let affected =
        sqlx::query("UPDATE work_locations SET archived = 1, updated_at = ? WHERE id = ? AND archived = 0")
            .bind(now)
            .bind(&id)
            .execute(pool.get_ref())
            .await?
            .rows_affected();
    if affected == 0 {
        return Err(EngineError::NotFound("work location"));
    }

    location_cache::invalidate(&id).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Location archived" })))
}
