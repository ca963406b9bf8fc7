use crate::attendance::gateway::parse_date;
use crate::attendance::{AttendanceGateway, StatisticsAggregator};
use crate::config::Config;
use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::statistics::{
    DashboardSummary, DateAttendanceView, EmployeeHistory, StatisticsSnapshot,
};
use crate::models::{ApiResponse, AttendanceListQuery, DateQuery, EmployeeQuery, MarkAttendanceReq};
use crate::roster::{self, RosterSource};
use crate::store::{AttendanceStore, bounded};
use crate::utils::stats_cache::StatsCache;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::debug;

fn optional_date(raw: Option<&str>) -> AttendanceResult<Option<NaiveDate>> {
    raw.filter(|d| !d.trim().is_empty()).map(parse_date).transpose()
}

pub(crate) async fn roster_snapshot(
    roster: &dyn RosterSource,
    config: &Config,
) -> AttendanceResult<Vec<Employee>> {
    bounded(config.store_timeout, roster.list_employees()).await
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendanceReq,
    responses(
        (status = 201, description = "Attendance marked; `data` holds the stored record", body = AttendanceRecord),
        (status = 400, description = "Malformed input, future date or invalid status", body = Object, example = json!({
            "success": false,
            "message": "Validation failed.",
            "error": "cannot mark attendance for future date 2030-01-01",
            "kind": "invalid_date",
            "retryable": false
        })),
        (status = 404, description = "Employee not on the roster"),
        (status = 502, description = "Backing store failure"),
        (status = 504, description = "Backing store timed out")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    gateway: web::Data<AttendanceGateway>,
    payload: web::Json<MarkAttendanceReq>,
) -> Result<HttpResponse, AttendanceError> {
    let record = gateway
        .mark_attendance(&payload.employee_id, &payload.date, &payload.status)
        .await?;

    Ok(ApiResponse::respond(
        StatusCode::CREATED,
        "Attendance marked successfully.",
        record,
    ))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceListQuery),
    responses(
        (status = 200, description = "Matching records, newest first", body = [AttendanceRecord]),
        (status = 400, description = "Invalid filter value")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| AttendanceStatus::from_str(s.trim()).map_err(|_| AttendanceError::InvalidStatus(s.to_string())))
        .transpose()?;

    let filter = AttendanceFilter {
        date: optional_date(query.date.as_deref())?,
        employee_id: query
            .employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        status,
    };
    debug!(?filter, "Listing attendance records");

    let records = bounded(config.store_timeout, store.list(&filter)).await?;
    Ok(ApiResponse::ok(
        "Attendance records retrieved successfully.",
        records,
    ))
}

/// Attendance for every roster employee on one date
#[utoipa::path(
    get,
    path = "/api/attendance/by_date",
    params(DateQuery),
    responses(
        (status = 200, description = "One entry per roster employee", body = DateAttendanceView),
        (status = 400, description = "Invalid date")
    ),
    tag = "Attendance"
)]
pub async fn by_date(
    aggregator: web::Data<StatisticsAggregator>,
    roster: web::Data<dyn RosterSource>,
    config: web::Data<Config>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let date = aggregator.resolve_date(optional_date(query.date.as_deref())?);
    let employees = roster_snapshot(roster.get_ref(), &config).await?;
    let view = aggregator.merger().build_date_view(date, &employees).await?;

    Ok(ApiResponse::ok(
        format!("Attendance records for {date} retrieved successfully."),
        view,
    ))
}

/// Attendance history of one employee
#[utoipa::path(
    get,
    path = "/api/attendance/by_employee",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "History with totals; empty when nothing was recorded", body = EmployeeHistory),
        (status = 400, description = "employee_id parameter missing")
    ),
    tag = "Attendance"
)]
pub async fn by_employee(
    aggregator: web::Data<StatisticsAggregator>,
    roster: web::Data<dyn RosterSource>,
    cache: web::Data<StatsCache>,
    config: web::Data<Config>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let employee_id = query
        .employee_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AttendanceError::InvalidInput("employee_id parameter is required.".to_string()))?;

    let mut history = cache
        .history(employee_id, aggregator.compute_employee_history(employee_id))
        .await?;

    let employees = roster_snapshot(roster.get_ref(), &config).await?;
    history.employee_name = roster::find(&employees, employee_id).map(|e| e.name.clone());

    Ok(ApiResponse::ok(
        "Attendance history retrieved successfully.",
        history,
    ))
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/attendance/statistics",
    params(DateQuery),
    responses(
        (status = 200, description = "Daily counts, month-to-date rate and department breakdown", body = DashboardSummary),
        (status = 400, description = "Invalid date")
    ),
    tag = "Attendance"
)]
pub async fn statistics(
    aggregator: web::Data<StatisticsAggregator>,
    roster: web::Data<dyn RosterSource>,
    cache: web::Data<StatsCache>,
    config: web::Data<Config>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let date = aggregator.resolve_date(optional_date(query.date.as_deref())?);
    let employees = roster_snapshot(roster.get_ref(), &config).await?;
    let summary = cache
        .dashboard(
            (date, roster::fingerprint(&employees)),
            aggregator.compute_dashboard(Some(date), &employees),
        )
        .await?;

    Ok(ApiResponse::ok("Statistics retrieved successfully.", summary))
}

/// Daily statistics only
#[utoipa::path(
    get,
    path = "/api/attendance/statistics/daily",
    params(DateQuery),
    responses(
        (status = 200, description = "Present, absent and unmarked counts for the date", body = StatisticsSnapshot),
        (status = 400, description = "Invalid date")
    ),
    tag = "Attendance"
)]
pub async fn daily_statistics(
    aggregator: web::Data<StatisticsAggregator>,
    roster: web::Data<dyn RosterSource>,
    cache: web::Data<StatsCache>,
    config: web::Data<Config>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let date = aggregator.resolve_date(optional_date(query.date.as_deref())?);
    let employees = roster_snapshot(roster.get_ref(), &config).await?;
    let snapshot = cache
        .daily(
            (date, roster::fingerprint(&employees)),
            aggregator.compute_daily_stats(Some(date), &employees),
        )
        .await?;

    Ok(ApiResponse::ok("Statistics retrieved successfully.", snapshot))
}
