use actix_web::{HttpResponse, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{EngineError, PolicyReason};
use crate::model::leave::{LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
use crate::rules;
use crate::rules::leave::BalanceEffect;
use crate::utils::sql::{SqlValue, UpdateBuilder};

#[derive(Deserialize, ToSchema)]
pub struct CreateBalance {
    pub user_id: String,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = 15)]
    pub allowance_days: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBalance {
    #[schema(nullable = true)]
    pub allowance_days: Option<i32>,
    /// Corrective override; normal accounting goes through request approvals.
    #[schema(nullable = true)]
    pub used_days: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
pub struct BalanceFilter {
    /// Filter by user ID
    pub user_id: Option<String>,
    /// Filter by year
    pub year: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    pub user_id: String,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = "date", example = "2025-03-03")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2025-03-07")]
    pub end_date: NaiveDate,
    #[schema(nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SetLeaveStatus {
    #[schema(example = "approved")]
    pub status: LeaveStatus,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveRequestFilter {
    /// Filter by user ID
    pub user_id: Option<String>,
    /// Filter by status
    pub status: Option<LeaveStatus>,
}

#[derive(Deserialize, IntoParams)]
pub struct ReminderQuery {
    /// Year to report on; defaults to the current year
    pub year: Option<i32>,
}

/// A balance row must always satisfy `0 <= used_days <= allowance_days`.
fn check_balance_figures(allowance_days: i32, used_days: i32) -> Result<(), EngineError> {
    if allowance_days < 0 || used_days < 0 {
        return Err(EngineError::Validation(
            "allowance_days and used_days must be non-negative".into(),
        ));
    }
    if used_days > allowance_days {
        return Err(EngineError::Validation(
            "used_days cannot exceed allowance_days".into(),
        ));
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<LeaveStatus, EngineError> {
    LeaveStatus::from_str(raw)
        .map_err(|_| EngineError::Storage(anyhow::anyhow!("unrecognized leave status '{raw}'")))
}

async fn fetch_request(pool: &MySqlPool, id: &str) -> Result<LeaveRequest, EngineError> {
    let row = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Create a leave balance for (user, year, type) — admin.
#[utoipa::path(
    post,
    path = "/api/v1/leave/balances",
    request_body = CreateBalance,
    responses(
        (status = 201, description = "Balance created", body = LeaveBalance),
        (status = 409, description = "Balance already exists for this user, year, and type"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn create_balance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateBalance>,
) -> Result<HttpResponse, EngineError> {
    if payload.user_id.is_empty() {
        return Err(EngineError::Validation("user_id is required".into()));
    }
    if payload.allowance_days < 0 {
        return Err(EngineError::Validation(
            "allowance_days must be non-negative".into(),
        ));
    }

    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let existing: Option<String> = sqlx::query_scalar(
        r#"
        SELECT id FROM leave_balances
        WHERE user_id = ? AND year = ? AND leave_type = ?
        FOR UPDATE
        "#,
    )
    .bind(&payload.user_id)
    .bind(payload.year)
    .bind(payload.leave_type.as_ref())
    .fetch_optional(&mut *tx)
    .await?;
    if existing.is_some() {
        return Err(PolicyReason::DuplicateRecord.into());
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO leave_balances
            (id, user_id, year, leave_type, allowance_days, used_days, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.user_id)
    .bind(payload.year)
    .bind(payload.leave_type.as_ref())
    .bind(payload.allowance_days)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let balance = sqlx::query_as::<_, LeaveBalance>("SELECT * FROM leave_balances WHERE id = ?")
        .bind(&id)
        .fetch_one(pool.get_ref())
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "balance": balance })))
}

/// List leave balances.
#[utoipa::path(
    get,
    path = "/api/v1/leave/balances",
    params(BalanceFilter),
    responses(
        (status = 200, description = "Balances", body = [LeaveBalance]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn list_balances(
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceFilter>,
) -> Result<HttpResponse, EngineError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut user_arg: Option<String> = None;
    let mut year_arg: Option<i32> = None;

    if let Some(user_id) = &query.user_id {
        where_sql.push_str(" AND user_id = ?");
        user_arg = Some(user_id.clone());
    }
    if let Some(year) = query.year {
        where_sql.push_str(" AND year = ?");
        year_arg = Some(year);
    }

    let sql = format!(
        "SELECT * FROM leave_balances{} ORDER BY year DESC, leave_type ASC LIMIT 200",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveBalance>(&sql);
    if let Some(user_id) = user_arg {
        data_q = data_q.bind(user_id);
    }
    if let Some(year) = year_arg {
        data_q = data_q.bind(year);
    }

    let balances = data_q.fetch_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "balances": balances })))
}

/// Corrective balance edit (admin). The resulting figures are validated
/// against the stored row, so a partial edit cannot leave `used_days` above
/// the allowance or either figure negative.
#[utoipa::path(
    patch,
    path = "/api/v1/leave/balances/{id}",
    params(("id" = String, Path, description = "Balance ID")),
    request_body = UpdateBalance,
    responses(
        (status = 200, description = "Updated balance", body = LeaveBalance),
        (status = 400, description = "No fields to update, or figures out of range"),
        (status = 404, description = "Balance not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn update_balance(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateBalance>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let mut update = UpdateBuilder::new("leave_balances");
    if let Some(allowance) = payload.allowance_days {
        update.set("allowance_days", SqlValue::I64(i64::from(allowance)));
    }
    if let Some(used) = payload.used_days {
        update.set("used_days", SqlValue::I64(i64::from(used)));
    }
    if update.is_empty() {
        return Err(EngineError::Validation(
            "at least one of allowance_days, used_days is required".into(),
        ));
    }
    update.set("updated_at", SqlValue::DateTime(Utc::now()));

    let mut tx = pool.begin().await?;

    let current: Option<LeaveBalance> =
        sqlx::query_as("SELECT * FROM leave_balances WHERE id = ? FOR UPDATE")
            .bind(&id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or(EngineError::NotFound("leave balance"))?;

    check_balance_figures(
        payload.allowance_days.unwrap_or(current.allowance_days),
        payload.used_days.unwrap_or(current.used_days),
    )?;

    update.execute(&mut *tx, &id).await?;
    tx.commit().await?;

    let balance = sqlx::query_as::<_, LeaveBalance>("SELECT * FROM leave_balances WHERE id = ?")
        .bind(&id)
        .fetch_one(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "balance": balance })))
}

/// Submit a leave request. The balance is checked but not debited until
/// approval.
#[utoipa::path(
    post,
    path = "/api/v1/leave/requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Request submitted as pending", body = LeaveRequest),
        (status = 400, description = "Invalid dates or insufficient balance", body = Object, example = json!({
            "error": "insufficient_balance",
            "message": "Insufficient leave balance for the requested days"
        })),
        (status = 404, description = "No balance record for this type and year"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn create_leave_request(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveRequest>,
) -> Result<HttpResponse, EngineError> {
    if payload.user_id.is_empty() {
        return Err(EngineError::Validation("user_id is required".into()));
    }
    if payload.start_date > payload.end_date {
        return Err(EngineError::Validation(
            "start_date cannot be after end_date".into(),
        ));
    }

    let business_days = rules::leave::business_days(payload.start_date, payload.end_date);
    let year = payload.start_date.year();

    let balance: Option<LeaveBalance> = sqlx::query_as(
        "SELECT * FROM leave_balances WHERE user_id = ? AND year = ? AND leave_type = ?",
    )
    .bind(&payload.user_id)
    .bind(year)
    .bind(payload.leave_type.as_ref())
    .fetch_optional(pool.get_ref())
    .await?;

    let balance = balance.ok_or(PolicyReason::NoBalanceRecord)?;
    rules::leave::check_submission(balance.allowance_days, balance.used_days, business_days)?;

    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (id, user_id, leave_type, start_date, end_date, status, reason, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.user_id)
    .bind(payload.leave_type.as_ref())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.reason)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let request = fetch_request(pool.get_ref(), &id).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "request": request,
        "business_days": business_days,
    })))
}

/// Transition a leave request's status, debiting or crediting the matching
/// balance atomically. Business days are always recomputed from the stored
/// dates so a reversal restores exactly what the approval debited.
#[utoipa::path(
    patch,
    path = "/api/v1/leave/requests/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    request_body = SetLeaveStatus,
    responses(
        (status = 200, description = "Updated request", body = LeaveRequest),
        (status = 400, description = "Approval would exceed the allowance"),
        (status = 404, description = "Request or balance not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn set_leave_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<SetLeaveStatus>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let request: Option<LeaveRequest> =
        sqlx::query_as("SELECT * FROM leave_requests WHERE id = ? FOR UPDATE")
            .bind(&id)
            .fetch_optional(&mut *tx)
            .await?;
    let request = request.ok_or(EngineError::NotFound("leave request"))?;

    let current = parse_status(&request.status)?;
    let business_days = rules::leave::business_days(request.start_date, request.end_date);
    let year = request.start_date.year();

    match rules::leave::balance_effect(current, payload.status, business_days) {
        BalanceEffect::Debit(days) => {
            let balance: Option<LeaveBalance> = sqlx::query_as(
                r#"
                SELECT * FROM leave_balances
                WHERE user_id = ? AND year = ? AND leave_type = ?
                FOR UPDATE
                "#,
            )
            .bind(&request.user_id)
            .bind(year)
            .bind(&request.leave_type)
            .fetch_optional(&mut *tx)
            .await?;
            let balance = balance.ok_or(PolicyReason::NoBalanceRecord)?;

            // Approval must never push used_days past the allowance.
            if balance.allowance_days - balance.used_days < days {
                return Err(PolicyReason::InsufficientBalance.into());
            }

            sqlx::query(
                "UPDATE leave_balances SET used_days = used_days + ?, updated_at = ? WHERE id = ?",
            )
            .bind(days)
            .bind(now)
            .bind(&balance.id)
            .execute(&mut *tx)
            .await?;
        }
        BalanceEffect::Credit(days) => {
            let affected = sqlx::query(
                r#"
                UPDATE leave_balances
                SET used_days = used_days - ?, updated_at = ?
                WHERE user_id = ? AND year = ? AND leave_type = ?
                "#,
            )
            .bind(days)
            .bind(now)
            .bind(&request.user_id)
            .bind(year)
            .bind(&request.leave_type)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if affected == 0 {
                return Err(PolicyReason::NoBalanceRecord.into());
            }
        }
        BalanceEffect::None => {}
    }

    sqlx::query("UPDATE leave_requests SET status = ?, updated_at = ? WHERE id = ?")
        .bind(payload.status.as_ref())
        .bind(now)
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let updated = fetch_request(pool.get_ref(), &id).await?;
    tracing::info!(request_id = %id, status = %updated.status, "leave status updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "request": updated })))
}

/// Fetch one leave request.
#[utoipa::path(
    get,
    path = "/api/v1/leave/requests/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 404, description = "Request not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn get_leave_request(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();
    let request: Option<LeaveRequest> =
        sqlx::query_as("SELECT * FROM leave_requests WHERE id = ?")
            .bind(&id)
            .fetch_optional(pool.get_ref())
            .await?;

    match request {
        Some(row) => Ok(HttpResponse::Ok().json(serde_json::json!({ "request": row }))),
        None => Err(EngineError::NotFound("leave request")),
    }
}

/// List leave requests, most recent start date first.
#[utoipa::path(
    get,
    path = "/api/v1/leave/requests",
    params(LeaveRequestFilter),
    responses(
        (status = 200, description = "Leave requests", body = [LeaveRequest]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn list_leave_requests(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveRequestFilter>,
) -> Result<HttpResponse, EngineError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<String> = Vec::new();

    if let Some(user_id) = &query.user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(user_id.clone());
    }
    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(status.to_string());
    }

    let sql = format!(
        "SELECT * FROM leave_requests{} ORDER BY start_date DESC LIMIT 200",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&sql);
    for arg in args {
        data_q = data_q.bind(arg);
    }

    let requests = data_q.fetch_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "requests": requests })))
}

/// Remaining-balance reminders for a user's year (display only).
#[utoipa::path(
    get,
    path = "/api/v1/leave/reminder/{user_id}",
    params(
        ("user_id" = String, Path, description = "User to check"),
        ReminderQuery
    ),
    responses(
        (status = 200, description = "Per-type reminders"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn leave_reminder(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    query: web::Query<ReminderQuery>,
) -> Result<HttpResponse, EngineError> {
    let user_id = path.into_inner();
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let balances: Vec<LeaveBalance> =
        sqlx::query_as("SELECT * FROM leave_balances WHERE user_id = ? AND year = ?")
            .bind(&user_id)
            .bind(year)
            .fetch_all(pool.get_ref())
            .await?;

    let reminders: Vec<_> = balances
        .iter()
        .map(|b| rules::leave::leave_reminder(&b.leave_type, b.allowance_days, b.used_days))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "year": year,
        "reminders": reminders,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrective_edits_keep_balance_figures_in_range() {
        assert!(check_balance_figures(15, 0).is_ok());
        assert!(check_balance_figures(15, 15).is_ok());

        assert!(matches!(
            check_balance_figures(-1, 0),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            check_balance_figures(15, -3),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            check_balance_figures(10, 11),
            Err(EngineError::Validation(_))
        ));
    }
}
