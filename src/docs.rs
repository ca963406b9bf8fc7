use crate::model::attendance::{AttendanceRecord, AttendanceStatus, DayStatus};
use crate::model::employee::Employee;
use crate::model::statistics::{
    DashboardSummary, DateAttendanceEntry, DateAttendanceView, DepartmentCount, EmployeeHistory,
    HistoryEntry, StatisticsSnapshot,
};
use crate::models::MarkAttendanceReq;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Tracking

Records daily **Present** / **Absent** marks for employees of the HRM roster and
derives views and statistics from them.

### Behaviour
- One record per employee per calendar date; marking again overwrites the status
- Future dates and employees missing from the roster are rejected
- Employees without a mark on a date are reported as **Unmarked**
- Rates are whole percentages rounded half up; an empty denominator yields 0

### Errors
Failures return `success: false` together with a machine-readable `kind` and a
`retryable` flag. Only `timeout` and `transport_failure` are retryable.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::by_date,
        crate::api::attendance::by_employee,
        crate::api::attendance::statistics,
        crate::api::attendance::daily_statistics,

        crate::api::employee::list_employees
    ),
    components(
        schemas(
            Employee,
            AttendanceRecord,
            AttendanceStatus,
            DayStatus,
            DateAttendanceEntry,
            DateAttendanceView,
            StatisticsSnapshot,
            HistoryEntry,
            EmployeeHistory,
            DepartmentCount,
            DashboardSummary,
            MarkAttendanceReq
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance marking and statistics APIs"),
        (name = "Employee", description = "Read-only roster APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/attendance",
            "/api/attendance/by_date",
            "/api/attendance/by_employee",
            "/api/attendance/statistics",
            "/api/attendance/statistics/daily",
            "/api/employees",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
