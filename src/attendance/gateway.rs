use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::roster::{self, RosterSource};
use crate::store::{AttendanceStore, bounded};
use crate::utils::clock::Clock;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Notified after every successful mark so cached derived data can be dropped.
#[async_trait]
pub trait AttendanceObserver: Send + Sync {
    async fn attendance_marked(&self, record: &AttendanceRecord);
}

/// The only write path into the attendance store.
pub struct AttendanceGateway {
    store: Arc<dyn AttendanceStore>,
    roster: Arc<dyn RosterSource>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    observers: RwLock<Vec<Arc<dyn AttendanceObserver>>>,
}

impl AttendanceGateway {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        roster: Arc<dyn RosterSource>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            roster,
            clock,
            timeout,
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn AttendanceObserver>) {
        match self.observers.write() {
            Ok(mut observers) => observers.push(observer),
            Err(poisoned) => poisoned.into_inner().push(observer),
        }
    }

    /// Records `status` for `employee_id` on `date` (`YYYY-MM-DD`).
    ///
    /// Every check runs before the store is touched, so a rejected mark
    /// never leaves a partial write behind. Repeating an identical mark is
    /// harmless.
    #[instrument(name = "mark_attendance", skip(self))]
    pub async fn mark_attendance(
        &self,
        employee_id: &str,
        date: &str,
        status: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(AttendanceError::InvalidInput(
                "Employee ID is required.".to_string(),
            ));
        }

        let roster = bounded(self.timeout, self.roster.list_employees()).await?;
        if roster::find(&roster, employee_id).is_none() {
            warn!("Mark rejected: employee not on roster");
            return Err(AttendanceError::UnknownEmployee(employee_id.to_string()));
        }

        let date = parse_date(date)?;
        if date > self.clock.today() {
            warn!("Mark rejected: future date");
            return Err(AttendanceError::InvalidDate(date));
        }

        let status = AttendanceStatus::from_str(status.trim())
            .map_err(|_| AttendanceError::InvalidStatus(status.to_string()))?;

        let record = bounded(self.timeout, self.store.upsert(employee_id, date, status)).await?;
        info!("Attendance marked");

        self.notify(&record).await;
        Ok(record)
    }

    async fn notify(&self, record: &AttendanceRecord) {
        let observers: Vec<_> = match self.observers.read() {
            Ok(observers) => observers.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        futures::future::join_all(observers.iter().map(|o| o.attendance_marked(record))).await;
    }
}

/// Parses a wire date. Only the bare `YYYY-MM-DD` form is accepted.
pub fn parse_date(raw: &str) -> AttendanceResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::InvalidInput(format!("Enter a valid date, got `{raw}`.")))
}
