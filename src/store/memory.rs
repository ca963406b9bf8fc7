use super::{AttendanceStore, validate_upsert};
use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus};
use crate::utils::clock::Clock;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    /// Primary table; iteration order is employee then ascending date.
    records: BTreeMap<(String, NaiveDate), AttendanceRecord>,
    /// Secondary index for date lookups.
    by_date: BTreeMap<NaiveDate, BTreeSet<String>>,
}

/// Process-local store. Writes take the lock for a single key so concurrent
/// marks on the same key resolve last-write-wins.
pub struct MemoryAttendanceStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryAttendanceStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    fn read(&self) -> AttendanceResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AttendanceError::TransportFailure("attendance table poisoned".to_string()))
    }

    fn write(&self) -> AttendanceResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AttendanceError::TransportFailure("attendance table poisoned".to_string()))
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn upsert(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AttendanceResult<AttendanceRecord> {
        // Direct callers get `InvalidInput` for a future date; the gateway
        // rejects the same date earlier as `InvalidDate`.
        validate_upsert(employee_id, date, self.clock.today())?;

        let record = AttendanceRecord::new(employee_id, date, status);
        let mut tables = self.write()?;
        tables
            .records
            .insert((employee_id.to_string(), date), record.clone());
        tables
            .by_date
            .entry(date)
            .or_default()
            .insert(employee_id.to_string());

        Ok(record)
    }

    async fn get(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let tables = self.read()?;
        Ok(tables.records.get(&(employee_id.to_string(), date)).cloned())
    }

    async fn get_by_date(&self, date: NaiveDate) -> AttendanceResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let Some(ids) = tables.by_date.get(&date) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .filter_map(|id| tables.records.get(&(id.clone(), date)).cloned())
            .collect())
    }

    async fn get_by_employee(&self, employee_id: &str) -> AttendanceResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let from = (employee_id.to_string(), NaiveDate::MIN);
        let to = (employee_id.to_string(), NaiveDate::MAX);

        Ok(tables
            .records
            .range(from..=to)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        if from > to {
            return Ok(Vec::new());
        }

        let guard = self.read()?;
        let tables = &*guard;
        Ok(tables
            .by_date
            .range(from..=to)
            .flat_map(|(date, ids)| {
                ids.iter()
                    .filter_map(move |id| tables.records.get(&(id.clone(), *date)).cloned())
            })
            .collect())
    }

    async fn list(&self, filter: &AttendanceFilter) -> AttendanceResult<Vec<AttendanceRecord>> {
        let guard = self.read()?;
        let tables = &*guard;
        Ok(tables
            .by_date
            .iter()
            .rev()
            .flat_map(|(date, ids)| {
                ids.iter()
                    .filter_map(move |id| tables.records.get(&(id.clone(), *date)))
            })
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::FixedClock;
    use crate::model::attendance::AttendanceStatus::{Absent, Present};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn store() -> MemoryAttendanceStore {
        MemoryAttendanceStore::new(Arc::new(FixedClock(day(20))))
    }

    #[actix_web::test]
    async fn second_mark_overwrites_status() {
        let store = store();
        store.upsert("EMP001", day(10), Present).await.unwrap();
        store.upsert("EMP001", day(10), Absent).await.unwrap();

        let records = store.get_by_date(day(10)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, Absent);
        assert_eq!(
            store.get("EMP001", day(10)).await.unwrap().unwrap().status,
            Absent
        );
    }

    #[actix_web::test]
    async fn employee_records_come_back_in_date_order() {
        let store = store();
        store.upsert("EMP001", day(12), Present).await.unwrap();
        store.upsert("EMP001", day(3), Absent).await.unwrap();
        store.upsert("EMP002", day(5), Present).await.unwrap();
        store.upsert("EMP001", day(7), Present).await.unwrap();

        let dates: Vec<_> = store
            .get_by_employee("EMP001")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![day(3), day(7), day(12)]);
    }

    #[actix_web::test]
    async fn employee_lookup_does_not_match_id_prefixes() {
        let store = store();
        store.upsert("EMP1", day(3), Present).await.unwrap();
        store.upsert("EMP10", day(4), Present).await.unwrap();

        let records = store.get_by_employee("EMP1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "EMP1");
    }

    #[actix_web::test]
    async fn rejects_invalid_keys_without_writing() {
        let store = store();
        assert!(matches!(
            store.upsert("", day(10), Present).await,
            Err(AttendanceError::InvalidInput(_))
        ));
        assert!(matches!(
            store.upsert("EMP001", day(21), Present).await,
            Err(AttendanceError::InvalidInput(_))
        ));
        assert!(store.list(&AttendanceFilter::default()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn range_is_inclusive_and_ordered() {
        let store = store();
        store.upsert("EMP002", day(2), Present).await.unwrap();
        store.upsert("EMP001", day(2), Absent).await.unwrap();
        store.upsert("EMP001", day(1), Present).await.unwrap();
        store.upsert("EMP001", day(5), Present).await.unwrap();

        let keys: Vec<_> = store
            .get_in_range(day(1), day(2))
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.employee_id, r.date))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("EMP001".to_string(), day(1)),
                ("EMP001".to_string(), day(2)),
                ("EMP002".to_string(), day(2)),
            ]
        );
        assert!(store.get_in_range(day(5), day(1)).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn list_applies_filter_newest_first() {
        let store = store();
        store.upsert("EMP001", day(1), Present).await.unwrap();
        store.upsert("EMP001", day(2), Absent).await.unwrap();
        store.upsert("EMP002", day(2), Present).await.unwrap();

        let all = store.list(&AttendanceFilter::default()).await.unwrap();
        let dates: Vec<_> = all.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2), day(2), day(1)]);

        let present = store
            .list(&AttendanceFilter {
                status: Some(Present),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(present.len(), 2);
        assert!(present.iter().all(|r| r.status == Present));
    }

    #[actix_web::test]
    async fn concurrent_marks_on_distinct_keys_all_land() {
        let store = Arc::new(store());
        let writes = (1..=10).map(|d| {
            let store = store.clone();
            async move { store.upsert(&format!("EMP{d:03}"), day(d), Present).await }
        });
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        assert_eq!(store.get_in_range(day(1), day(10)).await.unwrap().len(), 10);
    }
}
