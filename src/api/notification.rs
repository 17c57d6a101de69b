use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use std::str::FromStr;

use crate::error::EngineError;
use crate::model::user::{Role, User};

/// Pending remote-schedule and leave-request counts, for approver badges.
/// Delivery of the alert itself (push/Slack) happens elsewhere.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/pending-approvals/{user_id}",
    params(("user_id" = String, Path, description = "Requesting user")),
    responses(
        (status = 200, description = "Pending approval counts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Notifications"
)]
pub async fn pending_approvals(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let user_id = path.into_inner();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(pool.get_ref())
        .await?;

    let can_approve = user
        .as_ref()
        .and_then(|u| Role::from_str(&u.role).ok())
        .is_some_and(Role::can_approve);
    if !can_approve {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "pending_count": 0,
            "message": "Manager or admin role required",
        })));
    }

    let remote_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM remote_schedules WHERE status = 'pending' AND archived = 0",
    )
    .fetch_one(pool.get_ref())
    .await?;

    let leave_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'")
            .fetch_one(pool.get_ref())
            .await?;

    let total = remote_count + leave_count;
    let message = if total > 0 {
        format!("{total} requests awaiting approval")
    } else {
        "No pending requests".to_string()
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "pending_count": total,
        "remote_schedules": remote_count,
        "leave_requests": leave_count,
        "message": message,
    })))
}
