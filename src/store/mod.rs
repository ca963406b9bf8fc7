//! Attendance record storage.
//!
//! One record per `(employee_id, date)`; a second mark for the same key
//! overwrites the status. Records are never deleted through this interface.

pub mod memory;
pub mod mysql;

use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus};
use actix_web::rt::time::timeout;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;

pub use memory::MemoryAttendanceStore;
pub use mysql::MySqlAttendanceStore;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Inserts or overwrites the record for the key and returns it.
    async fn upsert(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AttendanceResult<AttendanceRecord>;

    async fn get(&self, employee_id: &str, date: NaiveDate)
    -> AttendanceResult<Option<AttendanceRecord>>;

    async fn get_by_date(&self, date: NaiveDate) -> AttendanceResult<Vec<AttendanceRecord>>;

    /// All records of one employee, ascending by date.
    async fn get_by_employee(&self, employee_id: &str) -> AttendanceResult<Vec<AttendanceRecord>>;

    /// Records dated within `from..=to`, ascending by date then employee id.
    async fn get_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>>;

    /// Records matching `filter`, newest date first then employee id.
    async fn list(&self, filter: &AttendanceFilter) -> AttendanceResult<Vec<AttendanceRecord>>;
}

/// Key checks every store applies before writing.
///
/// Both failures are `InvalidInput`, including a future date. Marks through
/// `AttendanceGateway` never get this far with a future date; it reports
/// those as `InvalidDate` before touching the store.
pub fn validate_upsert(employee_id: &str, date: NaiveDate, today: NaiveDate) -> AttendanceResult<()> {
    if employee_id.trim().is_empty() {
        return Err(AttendanceError::InvalidInput(
            "Employee ID is required.".to_string(),
        ));
    }
    if date > today {
        return Err(AttendanceError::InvalidInput(format!(
            "Cannot mark attendance for future date {date}."
        )));
    }
    Ok(())
}

/// Runs a backing-store call, failing with `Timeout` once `limit` elapses.
pub async fn bounded<T, F>(limit: Duration, call: F) -> AttendanceResult<T>
where
    F: Future<Output = AttendanceResult<T>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Backing store call timed out");
            Err(AttendanceError::Timeout(limit))
        }
    }
}
