use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{EngineError, PolicyReason};
use crate::model::remote_schedule::{RemoteSchedule, RemoteStatus};

#[derive(Deserialize, ToSchema)]
pub struct CreateRemoteSchedule {
    pub user_id: String,
    #[schema(value_type = String, format = "date", example = "2025-03-03")]
    pub work_date: NaiveDate,
    #[schema(nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewRemoteSchedule {
    #[schema(example = "approved")]
    pub status: RemoteStatus,
}

#[derive(Deserialize, IntoParams)]
pub struct RemoteScheduleFilter {
    /// Filter by user ID
    pub user_id: Option<String>,
    /// Schedules on or after this date
    pub start_date: Option<NaiveDate>,
    /// Schedules on or before this date
    pub end_date: Option<NaiveDate>,
}

async fn fetch_schedule(pool: &MySqlPool, id: &str) -> Result<RemoteSchedule, EngineError> {
    let row = sqlx::query_as::<_, RemoteSchedule>("SELECT * FROM remote_schedules WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Request a remote-work day. One non-archived schedule per (user, date).
#[utoipa::path(
    post,
    path = "/api/v1/remote-schedules",
    request_body = CreateRemoteSchedule,
    responses(
        (status = 201, description = "Schedule requested as pending", body = RemoteSchedule),
        (status = 409, description = "A schedule already exists for this date", body = Object, example = json!({
            "error": "duplicate_record",
            "message": "Record already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Remote"
)]
pub async fn create_schedule(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRemoteSchedule>,
) -> Result<HttpResponse, EngineError> {
    if payload.user_id.is_empty() {
        return Err(EngineError::Validation("user_id is required".into()));
    }

    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let existing: Option<String> = sqlx::query_scalar(
        r#"
        SELECT id FROM remote_schedules
        WHERE user_id = ? AND work_date = ? AND archived = 0
        FOR UPDATE
        "#,
    )
    .bind(&payload.user_id)
    .bind(payload.work_date)
    .fetch_optional(&mut *tx)
    .await?;
    if existing.is_some() {
        return Err(PolicyReason::DuplicateRecord.into());
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO remote_schedules
            (id, user_id, work_date, status, reason, archived, created_at, updated_at)
        VALUES (?, ?, ?, 'pending', ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.user_id)
    .bind(payload.work_date)
    .bind(&payload.reason)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let schedule = fetch_schedule(pool.get_ref(), &id).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "schedule": schedule })))
}

/// Approve or deny a pending remote-work request.
#[utoipa::path(
    patch,
    path = "/api/v1/remote-schedules/{id}",
    params(("id" = String, Path, description = "Schedule ID")),
    request_body = ReviewRemoteSchedule,
    responses(
        (status = 200, description = "Updated schedule", body = RemoteSchedule),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Remote"
)]
pub async fn review_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<ReviewRemoteSchedule>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let now = Utc::now();

    let affected = sqlx::query(
        "UPDATE remote_schedules SET status = ?, updated_at = ? WHERE id = ? AND archived = 0",
    )
    .bind(payload.status.as_ref())
    .bind(now)
    .bind(&id)
    .execute(pool.get_ref())
    .await?
    .rows_affected();
    if affected == 0 {
        return Err(EngineError::NotFound("remote schedule"));
    }

    let schedule = fetch_schedule(pool.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "schedule": schedule })))
}

/// Cancel (archive) a remote-work request, freeing the (user, date) slot.
#[utoipa::path(
    delete,
    path = "/api/v1/remote-schedules/{id}",
    params(("id" = String, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule cancelled"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Remote"
)]
pub async fn cancel_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let now = Utc::now();

    let affected = sqlx::query(
        "UPDATE remote_schedules SET archived = 1, updated_at = ? WHERE id = ? AND archived = 0",
    )
    .bind(now)
    .bind(&id)
    .execute(pool.get_ref())
    .await?
    .rows_affected();
    if affected == 0 {
        return Err(EngineError::NotFound("remote schedule"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Schedule cancelled" })))
}

/// List non-archived remote schedules.
#[utoipa::path(
    get,
    path = "/api/v1/remote-schedules",
    params(RemoteScheduleFilter),
    responses(
        (status = 200, description = "Remote schedules", body = [RemoteSchedule]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Remote"
)]
pub async fn list_schedules(
    pool: web::Data<MySqlPool>,
    query: web::Query<RemoteScheduleFilter>,
) -> Result<HttpResponse, EngineError> {
    // Helper enum for typed SQLx binding
    enum FilterValue {
        Str(String),
        Date(NaiveDate),
    }

    let mut where_sql = String::from(" WHERE archived = 0");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(user_id) = &query.user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::Str(user_id.clone()));
    }
    if let Some(start) = query.start_date {
        where_sql.push_str(" AND work_date >= ?");
        args.push(FilterValue::Date(start));
    }
    if let Some(end) = query.end_date {
        where_sql.push_str(" AND work_date <= ?");
        args.push(FilterValue::Date(end));
    }

    let sql = format!(
        "SELECT * FROM remote_schedules{} ORDER BY work_date ASC LIMIT 200",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, RemoteSchedule>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(v) => data_q.bind(v),
            FilterValue::Date(v) => data_q.bind(v),
        };
    }

    let schedules = data_q.fetch_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "schedules": schedules })))
}
