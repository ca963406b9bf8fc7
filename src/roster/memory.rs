use super::RosterSource;
use crate::error::{AttendanceError, AttendanceResult};
use crate::model::employee::Employee;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::RwLock;

/// Roster held in memory, optionally seeded from a JSON array on disk.
#[derive(Default)]
pub struct MemoryRoster {
    employees: RwLock<Vec<Employee>>,
}

impl MemoryRoster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: RwLock::new(employees),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read roster file `{}`", path.display()))?;
        let employees: Vec<Employee> = serde_json::from_str(&raw)
            .with_context(|| format!("roster file `{}` is not a JSON employee list", path.display()))?;

        tracing::info!(count = employees.len(), path = %path.display(), "Loaded roster");
        Ok(Self::new(employees))
    }

    #[cfg(test)]
    pub fn replace(&self, employees: Vec<Employee>) -> AttendanceResult<()> {
        let mut guard = self
            .employees
            .write()
            .map_err(|_| AttendanceError::TransportFailure("roster poisoned".to_string()))?;
        *guard = employees;
        Ok(())
    }
}

#[async_trait]
impl RosterSource for MemoryRoster {
    async fn list_employees(&self) -> AttendanceResult<Vec<Employee>> {
        self.employees
            .read()
            .map(|employees| employees.clone())
            .map_err(|_| AttendanceError::TransportFailure("roster poisoned".to_string()))
    }
}
