use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendanceReq {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "2024-01-10", format = "date")]
    pub date: String,
    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateQuery {
    /// Calendar date `YYYY-MM-DD`; today when omitted
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeQuery {
    /// Employee identifier, e.g. `EMP001`
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceListQuery {
    /// Filter by date `YYYY-MM-DD`
    pub date: Option<String>,
    /// Filter by employee identifier
    pub employee_id: Option<String>,
    /// Filter by status (`Present` or `Absent`)
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Case-insensitive match on name, email or employee id
    pub search: Option<String>,
    /// Exact department name
    pub department: Option<String>,
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn respond(status: StatusCode, message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }

    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        Self::respond(StatusCode::OK, message, data)
    }
}
