use super::RosterSource;
use crate::error::{AttendanceError, AttendanceResult};
use crate::model::employee::Employee;
use async_trait::async_trait;
use sqlx::MySqlPool;

/// Reads the `employees` table maintained by the employee service.
pub struct MySqlRoster {
    pool: MySqlPool,
}

impl MySqlRoster {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterSource for MySqlRoster {
    async fn list_employees(&self) -> AttendanceResult<Vec<Employee>> {
        // Newest employees first, matching the employee list screen.
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, name, department, email
            FROM employees
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch roster");
            AttendanceError::from(e)
        })
    }
}
