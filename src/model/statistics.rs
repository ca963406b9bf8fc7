use crate::model::attendance::{AttendanceStatus, DayStatus};
use crate::model::employee::Employee;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rounded percentage `part / whole * 100`, half rounding up. Zero when
/// `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 100 + whole / 2) / whole) as u32
}

/// One row of the per-date attendance screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateAttendanceEntry {
    pub employee: Employee,
    pub status: DayStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateAttendanceView {
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub entries: Vec<DateAttendanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2024-01-10",
    "total_employees": 3,
    "present_today": 1,
    "absent_today": 0,
    "not_marked_today": 2,
    "attendance_rate": 33
}))]
pub struct StatisticsSnapshot {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub total_employees: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub not_marked_today: usize,
    /// Whole-number percentage of the roster marked present.
    pub attendance_rate: u32,
}

impl StatisticsSnapshot {
    /// Tallies a date view. The three counts always sum to the roster size.
    pub fn from_view(view: &DateAttendanceView) -> Self {
        let total_employees = view.entries.len();
        let (mut present_today, mut absent_today) = (0, 0);
        for entry in &view.entries {
            match entry.status {
                DayStatus::Present => present_today += 1,
                DayStatus::Absent => absent_today += 1,
                DayStatus::Unmarked => {}
            }
        }

        Self {
            date: view.date,
            total_employees,
            present_today,
            absent_today,
            not_marked_today: total_employees - present_today - absent_today,
            attendance_rate: percentage(present_today, total_employees),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": "EMP001",
    "employee_name": "John Doe",
    "records": [
        {"date": "2024-01-08", "status": "Present"},
        {"date": "2024-01-09", "status": "Present"},
        {"date": "2024-01-10", "status": "Absent"}
    ],
    "total_days": 3,
    "present_count": 2,
    "absent_count": 1,
    "attendance_rate": 67
}))]
pub struct EmployeeHistory {
    pub employee_id: String,
    /// Filled in at the HTTP boundary while the employee is still on the roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub records: Vec<HistoryEntry>,
    pub total_days: usize,
    pub present_count: usize,
    pub absent_count: usize,
    pub attendance_rate: u32,
}

impl EmployeeHistory {
    /// Builds the summary from entries already ordered by date.
    pub fn from_entries(employee_id: impl Into<String>, records: Vec<HistoryEntry>) -> Self {
        let present_count = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        let absent_count = records.len() - present_count;

        Self {
            employee_id: employee_id.into(),
            employee_name: None,
            total_days: records.len(),
            present_count,
            absent_count,
            attendance_rate: percentage(present_count, records.len()),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 4)]
    pub count: usize,
}

/// Everything the dashboard shows in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub daily: StatisticsSnapshot,
    /// Present share of all records from the first of the month up to `daily.date`.
    pub month_to_date_rate: u32,
    pub department_breakdown: Vec<DepartmentCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 8), 38);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn history_counts_present_and_absent() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let history = EmployeeHistory::from_entries(
            "EMP001",
            vec![
                HistoryEntry { date: day(8), status: AttendanceStatus::Present },
                HistoryEntry { date: day(9), status: AttendanceStatus::Present },
                HistoryEntry { date: day(10), status: AttendanceStatus::Absent },
            ],
        );

        assert_eq!(history.total_days, 3);
        assert_eq!(history.present_count, 2);
        assert_eq!(history.absent_count, 1);
        assert_eq!(history.attendance_rate, 67);
    }

    #[test]
    fn empty_history_has_zero_rate() {
        let history = EmployeeHistory::from_entries("EMP404", Vec::new());
        assert_eq!(history.total_days, 0);
        assert_eq!(history.attendance_rate, 0);
        assert!(history.records.is_empty());
    }

    #[test]
    fn snapshot_serializes_with_snake_case_fields() {
        let view = DateAttendanceView {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            entries: Vec::new(),
        };
        let json = serde_json::to_value(StatisticsSnapshot::from_view(&view)).unwrap();
        assert_eq!(json["not_marked_today"], 0);
        assert_eq!(json["attendance_rate"], 0);
        assert_eq!(json["date"], "2024-01-10");
    }
}
