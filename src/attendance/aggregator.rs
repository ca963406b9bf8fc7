use super::merger::AttendanceMerger;
use crate::error::AttendanceResult;
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::Employee;
use crate::model::statistics::{
    DashboardSummary, DepartmentCount, EmployeeHistory, HistoryEntry, StatisticsSnapshot,
    percentage,
};
use crate::store::{AttendanceStore, bounded};
use crate::utils::clock::Clock;
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Employees per department, largest first, ties by name.
pub fn department_breakdown(roster: &[Employee]) -> Vec<DepartmentCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for employee in roster {
        *counts.entry(employee.department.as_str()).or_default() += 1;
    }

    let mut breakdown: Vec<_> = counts
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_string(),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.department.cmp(&b.department)));
    breakdown
}

/// Derives statistics from the current store contents. Nothing is cached
/// here; every call reads the store again.
#[derive(Clone)]
pub struct StatisticsAggregator {
    store: Arc<dyn AttendanceStore>,
    merger: AttendanceMerger,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl StatisticsAggregator {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            merger: AttendanceMerger::new(store.clone(), timeout),
            store,
            clock,
            timeout,
        }
    }

    pub fn merger(&self) -> &AttendanceMerger {
        &self.merger
    }

    /// Resolves an optional date against the clock.
    pub fn resolve_date(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| self.clock.today())
    }

    pub async fn compute_daily_stats(
        &self,
        date: Option<NaiveDate>,
        roster: &[Employee],
    ) -> AttendanceResult<StatisticsSnapshot> {
        let date = self.resolve_date(date);
        let view = self.merger.build_date_view(date, roster).await?;
        Ok(StatisticsSnapshot::from_view(&view))
    }

    pub async fn compute_employee_history(&self, employee_id: &str) -> AttendanceResult<EmployeeHistory> {
        let mut records = bounded(self.timeout, self.store.get_by_employee(employee_id)).await?;
        records.sort_by_key(|r| r.date);

        let entries = records
            .into_iter()
            .map(|r| HistoryEntry {
                date: r.date,
                status: r.status,
            })
            .collect();

        Ok(EmployeeHistory::from_entries(employee_id, entries))
    }

    pub async fn compute_dashboard(
        &self,
        date: Option<NaiveDate>,
        roster: &[Employee],
    ) -> AttendanceResult<DashboardSummary> {
        let date = self.resolve_date(date);
        let daily = self.compute_daily_stats(Some(date), roster).await?;

        let month_start = date.with_day(1).unwrap_or(date);
        let on_roster: HashSet<&str> = roster.iter().map(|e| e.employee_id.as_str()).collect();
        // Same population as `daily`: records of employees off the roster are left out.
        let month: Vec<_> = bounded(self.timeout, self.store.get_in_range(month_start, date))
            .await?
            .into_iter()
            .filter(|r| on_roster.contains(r.employee_id.as_str()))
            .collect();
        let month_present = month
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();

        Ok(DashboardSummary {
            daily,
            month_to_date_rate: percentage(month_present, month.len()),
            department_breakdown: department_breakdown(roster),
        })
    }
}
