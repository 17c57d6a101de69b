use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{EngineError, PolicyReason};
use crate::model::reservation::{Reservation, ReservationStatus};
use crate::model::resource::{Resource, ResourceType};
use crate::rules;
use crate::utils::sql::{SqlValue, UpdateBuilder};

#[derive(Deserialize, ToSchema)]
pub struct CreateReservation {
    pub resource_id: String,
    pub organizer_id: String,
    #[schema(value_type = String, format = "date-time", example = "2025-03-03T14:00:00Z")]
    pub starts_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time", example = "2025-03-03T15:00:00Z")]
    pub ends_at: DateTime<Utc>,
    #[schema(nullable = true)]
    pub agenda: Option<String>,
    #[schema(nullable = true)]
    pub attendees: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReservation {
    #[schema(example = "confirmed", nullable = true)]
    pub status: Option<ReservationStatus>,
    #[schema(nullable = true)]
    pub agenda: Option<String>,
    #[schema(nullable = true)]
    pub attendees: Option<Vec<String>>,
}

#[derive(Deserialize, IntoParams)]
pub struct ReservationFilter {
    /// Filter by resource ID
    pub resource_id: Option<String>,
    /// Filter by status
    pub status: Option<ReservationStatus>,
    /// Reservations ending after this instant
    pub from: Option<DateTime<Utc>>,
    /// Reservations starting before this instant
    pub until: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateResource {
    #[schema(example = "Room Jupiter")]
    pub name: String,
    #[schema(example = "MEETING_ROOM")]
    pub resource_type: ResourceType,
    #[schema(example = 8)]
    pub capacity: i32,
    #[serde(default)]
    pub has_zoom: bool,
    #[schema(example = "Asia/Seoul")]
    pub timezone: String,
    #[schema(nullable = true)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Deserialize, IntoParams)]
pub struct ResourceFilter {
    /// Filter by resource type
    pub resource_type: Option<ResourceType>,
}

async fn fetch_reservation(pool: &MySqlPool, id: &str) -> Result<Reservation, EngineError> {
    let row = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Reserve a resource for a half-open [starts_at, ends_at) slot.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created as pending", body = Reservation),
        (status = 400, description = "Invalid interval"),
        (status = 404, description = "Resource not found"),
        (status = 409, description = "Overlapping reservation exists", body = Object, example = json!({
            "error": "resource_conflict",
            "message": "Resource is already reserved for an overlapping time slot"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateReservation>,
) -> Result<HttpResponse, EngineError> {
    if payload.resource_id.is_empty() || payload.organizer_id.is_empty() {
        return Err(EngineError::Validation(
            "resource_id and organizer_id are required".into(),
        ));
    }
    rules::reservation::validate_interval(payload.starts_at, payload.ends_at)?;

    let now = Utc::now();

    // Conflict check and insert run against a locked view of the resource's
    // active reservations so concurrent bookings cannot both pass.
    let mut tx = pool.begin().await?;

    let resource: Option<String> =
        sqlx::query_scalar("SELECT id FROM resources WHERE id = ? AND archived = 0 FOR UPDATE")
            .bind(&payload.resource_id)
            .fetch_optional(&mut *tx)
            .await?;
    if resource.is_none() {
        return Err(EngineError::NotFound("resource"));
    }

    let active: Vec<Reservation> = sqlx::query_as(
        r#"
        SELECT * FROM reservations
        WHERE resource_id = ? AND status IN ('pending', 'confirmed')
        FOR UPDATE
        "#,
    )
    .bind(&payload.resource_id)
    .fetch_all(&mut *tx)
    .await?;

    if rules::reservation::find_conflict(&active, payload.starts_at, payload.ends_at).is_some() {
        return Err(PolicyReason::ResourceConflict.into());
    }

    let id = Uuid::new_v4().to_string();
    let attendees = serde_json::to_string(payload.attendees.as_deref().unwrap_or_default())?;
    sqlx::query(
        r#"
        INSERT INTO reservations
            (id, resource_id, organizer_id, starts_at, ends_at, status, agenda, attendees, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.resource_id)
    .bind(&payload.organizer_id)
    .bind(payload.starts_at)
    .bind(payload.ends_at)
    .bind(&payload.agenda)
    .bind(attendees)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let reservation = fetch_reservation(pool.get_ref(), &id).await?;
    tracing::info!(resource_id = %reservation.resource_id, reservation_id = %id, "reservation created");
    Ok(HttpResponse::Created().json(serde_json::json!({ "reservation": reservation })))
}

/// Update a reservation's status, agenda, or attendee list. Cancelling frees
/// the slot for re-booking; reactivating a cancelled reservation re-enters
/// the conflict set and must pass the same overlap check as a fresh booking.
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}",
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Updated reservation", body = Reservation),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reactivation overlaps an existing reservation", body = Object, example = json!({
            "error": "resource_conflict",
            "message": "Resource is already reserved for an overlapping time slot"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn update_reservation(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateReservation>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let mut update = UpdateBuilder::new("reservations");
    if let Some(status) = payload.status {
        update.set("status", SqlValue::String(status.to_string()));
    }
    if let Some(agenda) = &payload.agenda {
        update.set("agenda", SqlValue::String(agenda.clone()));
    }
    if let Some(attendees) = &payload.attendees {
        update.set("attendees", SqlValue::String(serde_json::to_string(attendees)?));
    }
    if update.is_empty() {
        return Err(EngineError::Validation(
            "at least one of status, agenda, attendees is required".into(),
        ));
    }
    update.set("updated_at", SqlValue::DateTime(Utc::now()));

    // The status check and the write share one lock scope so a concurrent
    // booking cannot slip between them.
    let mut tx = pool.begin().await?;

    let current: Option<Reservation> =
        sqlx::query_as("SELECT * FROM reservations WHERE id = ? FOR UPDATE")
            .bind(&id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or(EngineError::NotFound("reservation"))?;

    let reactivating = !current.blocks_slot()
        && payload
            .status
            .is_some_and(|next| next != ReservationStatus::Cancelled);
    if reactivating {
        let active: Vec<Reservation> = sqlx::query_as(
            r#"
            SELECT * FROM reservations
            WHERE resource_id = ? AND id <> ? AND status IN ('pending', 'confirmed')
            FOR UPDATE
            "#,
        )
        .bind(&current.resource_id)
        .bind(&id)
        .fetch_all(&mut *tx)
        .await?;
        if rules::reservation::find_conflict(&active, current.starts_at, current.ends_at)
            .is_some()
        {
            return Err(PolicyReason::ResourceConflict.into());
        }
    }

    update.execute(&mut *tx, &id).await?;
    tx.commit().await?;

    let reservation = fetch_reservation(pool.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "reservation": reservation })))
}

/// List reservations, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(ReservationFilter),
    responses(
        (status = 200, description = "Reservations", body = [Reservation]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn list_reservations(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReservationFilter>,
) -> Result<HttpResponse, EngineError> {
    // Helper enum for typed SQLx binding
    enum FilterValue {
        Str(String),
        Instant(DateTime<Utc>),
    }

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(resource_id) = &query.resource_id {
        where_sql.push_str(" AND resource_id = ?");
        args.push(FilterValue::Str(resource_id.clone()));
    }
    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }
    if let Some(from) = query.from {
        where_sql.push_str(" AND ends_at > ?");
        args.push(FilterValue::Instant(from));
    }
    if let Some(until) = query.until {
        where_sql.push_str(" AND starts_at < ?");
        args.push(FilterValue::Instant(until));
    }

    let sql = format!(
        "SELECT * FROM reservations{} ORDER BY starts_at ASC LIMIT 200",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Reservation>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(v) => data_q.bind(v),
            FilterValue::Instant(v) => data_q.bind(v),
        };
    }

    let reservations = data_q.fetch_all(pool.get_ref()).await?;

    // The attendees column is JSON text; callers get a typed array.
    let reservations: Vec<_> = reservations
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "resource_id": r.resource_id,
                "organizer_id": r.organizer_id,
                "starts_at": r.starts_at,
                "ends_at": r.ends_at,
                "status": r.status,
                "agenda": r.agenda,
                "attendees": r.attendees(),
                "created_at": r.created_at,
                "updated_at": r.updated_at,
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "reservations": reservations })))
}

/// Register a bookable resource (admin).
#[utoipa::path(
    post,
    path = "/api/v1/resources",
    request_body = CreateResource,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn create_resource(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateResource>,
) -> Result<HttpResponse, EngineError> {
    if payload.name.trim().is_empty() {
        return Err(EngineError::Validation("name is required".into()));
    }
    if payload.capacity < 0 {
        return Err(EngineError::Validation("capacity must be non-negative".into()));
    }

    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let metadata = payload
        .metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO resources
            (id, name, resource_type, capacity, has_zoom, timezone, metadata, archived, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(payload.name.trim())
    .bind(payload.resource_type.as_ref())
    .bind(payload.capacity)
    .bind(payload.has_zoom)
    .bind(&payload.timezone)
    .bind(metadata)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ?")
        .bind(&id)
        .fetch_one(pool.get_ref())
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "resource": resource })))
}

/// List active (non-archived) resources.
#[utoipa::path(
    get,
    path = "/api/v1/resources",
    params(ResourceFilter),
    responses(
        (status = 200, description = "Resources", body = [Resource]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn list_resources(
    pool: web::Data<MySqlPool>,
    query: web::Query<ResourceFilter>,
) -> Result<HttpResponse, EngineError> {
    let resources: Vec<Resource> = match query.resource_type {
        Some(kind) => {
            sqlx::query_as(
                "SELECT * FROM resources WHERE archived = 0 AND resource_type = ? ORDER BY name ASC LIMIT 100",
            )
            .bind(kind.as_ref())
            .fetch_all(pool.get_ref())
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM resources WHERE archived = 0 ORDER BY name ASC LIMIT 100")
                .fetch_all(pool.get_ref())
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "resources": resources })))
}
