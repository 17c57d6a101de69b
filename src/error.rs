use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use strum_macros::AsRefStr;

/// Named reasons a business rule can reject an action. Each maps to a stable
/// machine-readable code (snake_case) and a user-facing message, so the
/// calling UI can render an accurate explanation rather than a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PolicyReason {
    #[display(fmt = "Already clocked in today")]
    AlreadyClockedIn,
    #[display(fmt = "Location data required for ONSITE mode")]
    LocationDataRequired,
    #[display(fmt = "Location verification failed")]
    LocationVerificationFailed,
    #[display(fmt = "No approved remote work schedule for today")]
    RemoteNotApproved,
    #[display(fmt = "No active clock-in found for today")]
    NoActiveSession,
    #[display(fmt = "Reservation must start before it ends")]
    InvalidInterval,
    #[display(fmt = "Resource is already reserved for an overlapping time slot")]
    ResourceConflict,
    #[display(fmt = "No leave balance found for this type and year")]
    NoBalanceRecord,
    #[display(fmt = "Insufficient leave balance for the requested days")]
    InsufficientBalance,
    #[display(fmt = "Record already exists")]
    DuplicateRecord,
}

impl PolicyReason {
    fn status_code(self) -> StatusCode {
        match self {
            PolicyReason::AlreadyClockedIn
            | PolicyReason::LocationDataRequired
            | PolicyReason::InvalidInterval
            | PolicyReason::InsufficientBalance => StatusCode::BAD_REQUEST,
            PolicyReason::LocationVerificationFailed | PolicyReason::RemoteNotApproved => {
                StatusCode::FORBIDDEN
            }
            PolicyReason::NoActiveSession | PolicyReason::NoBalanceRecord => StatusCode::NOT_FOUND,
            PolicyReason::ResourceConflict | PolicyReason::DuplicateRecord => StatusCode::CONFLICT,
        }
    }
}

/// Crate-wide error taxonomy. Validation and policy failures carry
/// user-actionable meaning and are reported verbatim; storage failures are
/// logged in full but reported generically.
#[derive(Debug, Display)]
pub enum EngineError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "{}", _0)]
    Policy(PolicyReason),
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),
    #[display(fmt = "Internal server error")]
    Storage(anyhow::Error),
}

impl From<PolicyReason> for EngineError {
    fn from(reason: PolicyReason) -> Self {
        EngineError::Policy(reason)
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Storage(err.into())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Validation(format!("Invalid JSON value: {}", err))
    }
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::Policy(reason) => reason.status_code(),
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code: String = match self {
            EngineError::Validation(_) => "validation_error".to_string(),
            EngineError::Policy(reason) => reason.as_ref().to_string(),
            EngineError::NotFound(_) => "not_found".to_string(),
            EngineError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                "internal_error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": code,
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_reasons_have_stable_codes() {
        assert_eq!(PolicyReason::AlreadyClockedIn.as_ref(), "already_clocked_in");
        assert_eq!(PolicyReason::ResourceConflict.as_ref(), "resource_conflict");
        assert_eq!(
            PolicyReason::InsufficientBalance.as_ref(),
            "insufficient_balance"
        );
    }

    #[test]
    fn status_codes_match_failure_class() {
        assert_eq!(
            PolicyReason::ResourceConflict.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PolicyReason::RemoteNotApproved.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EngineError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
