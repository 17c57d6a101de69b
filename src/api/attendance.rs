use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{EngineError, PolicyReason};
use crate::model::attendance::{AttendanceLog, WorkMode};
use crate::model::weekly_summary::WeeklySummary;
use crate::rules;
use crate::rules::attendance::ClockInFacts;
use crate::rules::geofence::Coordinates;
use crate::rules::summary::WeeklyAlert;
use crate::utils::location_cache;

#[derive(Deserialize, ToSchema)]
pub struct ClockInRequest {
    pub user_id: String,
    #[schema(example = "ONSITE")]
    pub work_mode: WorkMode,
    #[schema(nullable = true)]
    pub location_id: Option<String>,
    #[schema(example = 37.5669, nullable = true)]
    pub latitude: Option<f64>,
    #[schema(example = 126.978, nullable = true)]
    pub longitude: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ClockOutRequest {
    pub user_id: String,
    /// Recorded only; clock-out applies no geofence policy.
    #[schema(nullable = true)]
    pub latitude: Option<f64>,
    #[schema(nullable = true)]
    pub longitude: Option<f64>,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceFilter {
    /// Filter by user ID
    pub user_id: Option<String>,
    /// Logs with clock_in on or after this date
    pub start_date: Option<NaiveDate>,
    /// Logs with clock_in before the end of this date
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Monday of the requested ISO week; defaults to the current week
    pub week_start: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct WeeklyAlertResponse {
    #[serde(flatten)]
    pub alert: WeeklyAlert,
    #[schema(value_type = String, format = "date")]
    pub week_start: NaiveDate,
}

fn coordinates_from(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinates>, EngineError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => {
            if !lat.is_finite() || !lon.is_finite() {
                return Err(EngineError::Validation(
                    "latitude and longitude must be finite numbers".into(),
                ));
            }
            Ok(Some(Coordinates {
                latitude: lat,
                longitude: lon,
            }))
        }
        _ => Ok(None),
    }
}

async fn fetch_log(pool: &MySqlPool, id: &str) -> Result<AttendanceLog, EngineError> {
    let log = sqlx::query_as::<_, AttendanceLog>("SELECT * FROM attendance_logs WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(log)
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockInRequest,
    responses(
        (status = 201, description = "Clocked in", body = AttendanceLog),
        (status = 400, description = "Already clocked in today, or location data missing", body = Object, example = json!({
            "error": "already_clocked_in",
            "message": "Already clocked in today"
        })),
        (status = 403, description = "Location verification failed or remote work not approved"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockInRequest>,
) -> Result<HttpResponse, EngineError> {
    if payload.user_id.is_empty() {
        return Err(EngineError::Validation("user_id is required".into()));
    }
    let coordinates = coordinates_from(payload.latitude, payload.longitude)?;

    let now = Utc::now();
    let today = now.date_naive();

    // Cached read; an archive elsewhere is visible here within the cache TTL.
    let location = match &payload.location_id {
        Some(id) => location_cache::get_location(pool.get_ref(), id).await?,
        None => None,
    };

    // The open-log check and the insert must observe a consistent view.
    let mut tx = pool.begin().await?;

    let open_log: Option<String> = sqlx::query_scalar(
        r#"
        SELECT id FROM attendance_logs
        WHERE user_id = ? AND DATE(clock_in) = ? AND clock_out IS NULL
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(&payload.user_id)
    .bind(today)
    .fetch_optional(&mut *tx)
    .await?;

    let remote_approved = if payload.work_mode == WorkMode::Remote {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM remote_schedules
            WHERE user_id = ? AND work_date = ? AND status = 'approved' AND archived = 0
            "#,
        )
        .bind(&payload.user_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;
        count > 0
    } else {
        false
    };

    let facts = ClockInFacts {
        already_clocked_in: open_log.is_some(),
        coordinates,
        location_id_given: payload.location_id.is_some(),
        location: location.as_ref(),
        remote_approved,
    };
    let verified = rules::attendance::authorize_clock_in(payload.work_mode, &facts)?;

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO attendance_logs
            (id, user_id, clock_in, work_mode, location_id, verified, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.user_id)
    .bind(now)
    .bind(payload.work_mode.as_ref())
    .bind(&payload.location_id)
    .bind(verified)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let log = fetch_log(pool.get_ref(), &id).await?;
    tracing::info!(user_id = %log.user_id, mode = %log.work_mode, verified, "clock-in recorded");
    Ok(HttpResponse::Created().json(serde_json::json!({ "log": log })))
}

/// Clock-out endpoint. Closes today's open session and folds the elapsed
/// minutes into the weekly summary in the same transaction.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-out",
    request_body = ClockOutRequest,
    responses(
        (status = 200, description = "Clocked out", body = AttendanceLog),
        (status = 404, description = "No active clock-in found for today", body = Object, example = json!({
            "error": "no_active_session",
            "message": "No active clock-in found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockOutRequest>,
) -> Result<HttpResponse, EngineError> {
    if payload.user_id.is_empty() {
        return Err(EngineError::Validation("user_id is required".into()));
    }
    // Coordinates are accepted for the record but carry no policy weight.
    coordinates_from(payload.latitude, payload.longitude)?;

    let now = Utc::now();
    let today = now.date_naive();

    let mut tx = pool.begin().await?;

    let log: Option<AttendanceLog> = sqlx::query_as(
        r#"
        SELECT * FROM attendance_logs
        WHERE user_id = ? AND DATE(clock_in) = ? AND clock_out IS NULL
        ORDER BY clock_in DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(&payload.user_id)
    .bind(today)
    .fetch_optional(&mut *tx)
    .await?;

    let log = log.ok_or(PolicyReason::NoActiveSession)?;

    sqlx::query("UPDATE attendance_logs SET clock_out = ?, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(now)
        .bind(&log.id)
        .execute(&mut *tx)
        .await?;

    let minutes = rules::week::elapsed_minutes(log.clock_in, now);
    let week_start = rules::week::week_start(today);

    let summary: Option<WeeklySummary> = sqlx::query_as(
        "SELECT * FROM weekly_summaries WHERE user_id = ? AND week_start = ? FOR UPDATE",
    )
    .bind(&payload.user_id)
    .bind(week_start)
    .fetch_optional(&mut *tx)
    .await?;

    match summary {
        Some(existing) => {
            let totals = rules::summary::accumulate(existing.total_minutes, minutes);
            sqlx::query(
                r#"
                UPDATE weekly_summaries
                SET total_minutes = ?, overtime_minutes = ?, exceeds_limit = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(totals.total_minutes)
            .bind(totals.overtime_minutes)
            .bind(totals.exceeds_limit)
            .bind(now)
            .bind(&existing.id)
            .execute(&mut *tx)
            .await?;
        }
        None => {
            let totals = rules::summary::accumulate(0, minutes);
            sqlx::query(
                r#"
                INSERT INTO weekly_summaries
                    (id, user_id, week_start, total_minutes, overtime_minutes, exceeds_limit, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&payload.user_id)
            .bind(week_start)
            .bind(totals.total_minutes)
            .bind(totals.overtime_minutes)
            .bind(totals.exceeds_limit)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    let closed = fetch_log(pool.get_ref(), &log.id).await?;
    tracing::info!(user_id = %closed.user_id, minutes, "clock-out recorded");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "log": closed })))
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
    Date(NaiveDate),
}

/// List attendance logs, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance logs", body = [AttendanceLog]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, EngineError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(user_id) = &query.user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::Str(user_id.clone()));
    }
    if let Some(start) = query.start_date {
        where_sql.push_str(" AND clock_in >= ?");
        args.push(FilterValue::Date(start));
    }
    if let Some(end) = query.end_date {
        where_sql.push_str(" AND DATE(clock_in) <= ?");
        args.push(FilterValue::Date(end));
    }

    let sql = format!(
        "SELECT * FROM attendance_logs{} ORDER BY clock_in DESC LIMIT 100",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceLog>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(v) => data_q.bind(v),
            FilterValue::Date(v) => data_q.bind(v),
        };
    }

    let logs = data_q.fetch_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "logs": logs })))
}

/// Weekly summary for a user; a zeroed summary when no row exists yet.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary/{user_id}",
    params(
        ("user_id" = String, Path, description = "User to summarize"),
        SummaryQuery
    ),
    responses(
        (status = 200, description = "Weekly summary", body = WeeklySummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_weekly_summary(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, EngineError> {
    let user_id = path.into_inner();
    let week_start = query
        .week_start
        .unwrap_or_else(|| rules::week::week_start(Utc::now().date_naive()));

    let summary: Option<WeeklySummary> =
        sqlx::query_as("SELECT * FROM weekly_summaries WHERE user_id = ? AND week_start = ?")
            .bind(&user_id)
            .bind(week_start)
            .fetch_optional(pool.get_ref())
            .await?;

    match summary {
        Some(row) => Ok(HttpResponse::Ok().json(serde_json::json!({ "summary": row }))),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({
            "summary": {
                "user_id": user_id,
                "week_start": week_start,
                "total_minutes": 0,
                "overtime_minutes": 0,
                "exceeds_limit": false,
            }
        }))),
    }
}

/// Overtime alert for the user's current week (display only).
#[utoipa::path(
    get,
    path = "/api/v1/attendance/alert/{user_id}",
    params(
        ("user_id" = String, Path, description = "User to check"),
        SummaryQuery
    ),
    responses(
        (status = 200, description = "Alert level and message", body = WeeklyAlertResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn weekly_alert(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, EngineError> {
    let user_id = path.into_inner();
    let week_start = query
        .week_start
        .unwrap_or_else(|| rules::week::week_start(Utc::now().date_naive()));

    let total_minutes: Option<i64> = sqlx::query_scalar(
        "SELECT total_minutes FROM weekly_summaries WHERE user_id = ? AND week_start = ?",
    )
    .bind(&user_id)
    .bind(week_start)
    .fetch_optional(pool.get_ref())
    .await?;

    let alert = rules::summary::weekly_alert(total_minutes.unwrap_or(0));
    Ok(HttpResponse::Ok().json(WeeklyAlertResponse { alert, week_start }))
}
