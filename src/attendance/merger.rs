use crate::error::AttendanceResult;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, DayStatus};
use crate::model::employee::Employee;
use crate::model::statistics::{DateAttendanceEntry, DateAttendanceView};
use crate::store::{AttendanceStore, bounded};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Joins a roster with one day's records. One entry per roster employee, in
/// roster order; records for employees outside the roster or for other dates
/// are ignored.
pub fn merge_roster(
    date: NaiveDate,
    roster: &[Employee],
    records: &[AttendanceRecord],
) -> DateAttendanceView {
    let by_employee: HashMap<&str, AttendanceStatus> = records
        .iter()
        .filter(|r| r.date == date)
        .map(|r| (r.employee_id.as_str(), r.status))
        .collect();

    let entries = roster
        .iter()
        .map(|employee| DateAttendanceEntry {
            employee: employee.clone(),
            status: by_employee
                .get(employee.employee_id.as_str())
                .map_or(DayStatus::Unmarked, |s| DayStatus::from(*s)),
        })
        .collect();

    DateAttendanceView { date, entries }
}

#[derive(Clone)]
pub struct AttendanceMerger {
    store: Arc<dyn AttendanceStore>,
    timeout: Duration,
}

impl AttendanceMerger {
    pub fn new(store: Arc<dyn AttendanceStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn build_date_view(
        &self,
        date: NaiveDate,
        roster: &[Employee],
    ) -> AttendanceResult<DateAttendanceView> {
        let records = bounded(self.timeout, self.store.get_by_date(date)).await?;
        tracing::debug!(%date, roster = roster.len(), records = records.len(), "Building date view");
        Ok(merge_roster(date, roster, &records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAttendanceStore;
    use crate::utils::clock::FixedClock;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn employee(id: &str) -> Employee {
        Employee::new(id, format!("Name {id}"), "Engineering", format!("{id}@company.com"))
    }

    fn record(id: &str, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(id, date, status)
    }

    #[test]
    fn unmarked_when_no_record() {
        let roster = vec![employee("E1"), employee("E2")];
        let view = merge_roster(day(10), &roster, &[]);
        assert_eq!(view.entries.len(), 2);
        assert!(view.entries.iter().all(|e| e.status == DayStatus::Unmarked));
    }

    #[test]
    fn keeps_roster_order_and_drops_unknown_employees() {
        let roster = vec![employee("E3"), employee("E1"), employee("E2")];
        let records = vec![
            record("E1", day(10), AttendanceStatus::Present),
            record("E9", day(10), AttendanceStatus::Present),
            record("E2", day(10), AttendanceStatus::Absent),
        ];

        let view = merge_roster(day(10), &roster, &records);
        let rows: Vec<_> = view
            .entries
            .iter()
            .map(|e| (e.employee.employee_id.as_str(), e.status))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("E3", DayStatus::Unmarked),
                ("E1", DayStatus::Present),
                ("E2", DayStatus::Absent),
            ]
        );
    }

    #[test]
    fn ignores_records_for_other_dates() {
        let roster = vec![employee("E1")];
        let records = vec![record("E1", day(9), AttendanceStatus::Present)];
        let view = merge_roster(day(10), &roster, &records);
        assert_eq!(view.entries[0].status, DayStatus::Unmarked);
    }

    #[actix_web::test]
    async fn view_reflects_employee_added_after_records_exist() {
        let store = Arc::new(MemoryAttendanceStore::new(Arc::new(FixedClock(day(20)))));
        store
            .upsert("E1", day(10), AttendanceStatus::Present)
            .await
            .unwrap();
        let merger = AttendanceMerger::new(store, Duration::from_secs(1));

        let view = merger
            .build_date_view(day(10), &[employee("E1"), employee("E2")])
            .await
            .unwrap();
        assert_eq!(view.entries[0].status, DayStatus::Present);
        assert_eq!(view.entries[1].status, DayStatus::Unmarked);
    }

    fn status_strategy() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![Just(AttendanceStatus::Present), Just(AttendanceStatus::Absent)]
    }

    proptest! {
        #[test]
        fn view_has_one_entry_per_roster_employee(
            roster_size in 0usize..30,
            marks in proptest::collection::vec((0usize..40, status_strategy()), 0..60),
        ) {
            let roster: Vec<_> = (0..roster_size).map(|i| employee(&format!("E{i}"))).collect();
            let records: Vec<_> = marks
                .iter()
                .map(|(i, s)| record(&format!("E{i}"), day(10), *s))
                .collect();

            let view = merge_roster(day(10), &roster, &records);
            prop_assert_eq!(view.entries.len(), roster.len());
            for (entry, employee) in view.entries.iter().zip(&roster) {
                prop_assert_eq!(&entry.employee, employee);
            }
        }
    }
}
