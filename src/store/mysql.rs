use super::{AttendanceStore, validate_upsert};
use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus};
use crate::utils::clock::Clock;
use crate::utils::db_utils::{SqlValue, WhereBuilder, bind_values};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};

const ATTENDANCE_SELECT_SQL: &str =
    "SELECT employee_id, date, status, updated_at FROM attendance";

#[derive(FromRow)]
struct AttendanceRow {
    employee_id: String,
    date: NaiveDate,
    status: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = AttendanceError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status).map_err(|_| {
            AttendanceError::TransportFailure(format!(
                "invalid persisted status `{}` for {} on {}",
                row.status, row.employee_id, row.date
            ))
        })?;

        Ok(AttendanceRecord {
            employee_id: row.employee_id,
            date: row.date,
            status,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<AttendanceRow>) -> AttendanceResult<Vec<AttendanceRecord>> {
    rows.into_iter().map(AttendanceRecord::try_from).collect()
}

/// Attendance table in MySQL. The `(employee_id, date)` unique key makes
/// the upsert atomic per key.
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
    clock: Arc<dyn Clock>,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn upsert(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AttendanceResult<AttendanceRecord> {
        // Direct callers get `InvalidInput` for a future date; the gateway
        // rejects the same date earlier as `InvalidDate`.
        validate_upsert(employee_id, date, self.clock.today())?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE status = VALUES(status), updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, %date, "Attendance upsert failed");
            AttendanceError::from(e)
        })?;

        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE employee_id = ? AND date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn get(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE employee_id = ? AND date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn get_by_date(&self, date: NaiveDate) -> AttendanceResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE date = ? ORDER BY employee_id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn get_by_employee(&self, employee_id: &str) -> AttendanceResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE employee_id = ? ORDER BY date ASC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn get_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE date BETWEEN ? AND ? ORDER BY date ASC, employee_id ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn list(&self, filter: &AttendanceFilter) -> AttendanceResult<Vec<AttendanceRecord>> {
        let select = WhereBuilder::new()
            .eq("date", filter.date.map(SqlValue::Date))
            .eq("employee_id", filter.employee_id.clone().map(SqlValue::String))
            .eq(
                "status",
                filter.status.map(|s| SqlValue::String(s.to_string())),
            )
            .build(ATTENDANCE_SELECT_SQL, "ORDER BY date DESC, employee_id ASC");
        debug!(sql = %select.sql, bindings = ?select.values, "Listing attendance");

        let query = sqlx::query_as::<_, AttendanceRow>(&select.sql);
        let rows = bind_values(query, select.values)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, sql = %select.sql, "Failed to list attendance");
                AttendanceError::from(e)
            })?;

        into_records(rows)
    }
}
