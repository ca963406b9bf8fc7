use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Every failure the attendance core can surface to a caller.
///
/// Validation kinds are deterministic for a given input. `Timeout` and
/// `TransportFailure` come from the backing store and may succeed on retry;
/// the core never retries on its own.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("employee with ID {0} does not exist")]
    UnknownEmployee(String),

    #[error("cannot mark attendance for future date {0}")]
    InvalidDate(NaiveDate),

    #[error("status must be either Present or Absent, got `{0}`")]
    InvalidStatus(String),

    #[error("backing store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("backing store failure: {0}")]
    TransportFailure(String),
}

impl AttendanceError {
    /// Stable machine-readable name used in the JSON error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnknownEmployee(_) => "unknown_employee",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidStatus(_) => "invalid_status",
            Self::Timeout(_) => "timeout",
            Self::TransportFailure(_) => "transport_failure",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::TransportFailure(_))
    }
}

impl From<sqlx::Error> for AttendanceError {
    fn from(value: sqlx::Error) -> Self {
        Self::TransportFailure(value.to_string())
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidDate(_) | Self::InvalidStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnknownEmployee(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::TransportFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_retryable() {
            "Attendance service temporarily unavailable, please retry."
        } else {
            "Validation failed."
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": message,
            "error": self.to_string(),
            "kind": self.kind(),
            "retryable": self.is_retryable(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_not_retryable() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(!AttendanceError::InvalidInput("x".into()).is_retryable());
        assert!(!AttendanceError::UnknownEmployee("E9".into()).is_retryable());
        assert!(!AttendanceError::InvalidDate(date).is_retryable());
        assert!(!AttendanceError::InvalidStatus("Late".into()).is_retryable());
        assert!(AttendanceError::Timeout(Duration::from_millis(10)).is_retryable());
        assert!(AttendanceError::TransportFailure("down".into()).is_retryable());
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AttendanceError::InvalidStatus("Late".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::UnknownEmployee("E9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AttendanceError::Timeout(Duration::from_secs(1)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AttendanceError::TransportFailure("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
