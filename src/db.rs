use anyhow::Context;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::time::Duration;

const CREATE_EMPLOYEES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    employee_id VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(254) NOT NULL UNIQUE,
    department VARCHAR(50) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    INDEX idx_employees_department (department)
)
"#;

const CREATE_ATTENDANCE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS attendance (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    employee_id VARCHAR(20) NOT NULL,
    date DATE NOT NULL,
    status VARCHAR(10) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE KEY uq_attendance_employee_date (employee_id, date),
    INDEX idx_attendance_date (date),
    INDEX idx_attendance_status (status)
)
"#;

pub async fn init_db(database_url: &str, acquire_timeout: Duration) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    for statement in [CREATE_EMPLOYEES_SQL, CREATE_ATTENDANCE_SQL] {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .context("Failed to bootstrap schema")?;
    }

    Ok(pool)
}
