//! Read-only access to the employee roster owned by the employee service.

pub mod memory;
pub mod mysql;

use crate::error::AttendanceResult;
use crate::model::employee::Employee;
use async_trait::async_trait;
use std::hash::{DefaultHasher, Hash, Hasher};

pub use memory::MemoryRoster;
pub use mysql::MySqlRoster;

#[async_trait]
pub trait RosterSource: Send + Sync {
    /// All known employees in display order.
    async fn list_employees(&self) -> AttendanceResult<Vec<Employee>>;
}

/// Looks up an employee in a roster snapshot.
pub fn find<'a>(roster: &'a [Employee], employee_id: &str) -> Option<&'a Employee> {
    roster.iter().find(|e| e.employee_id == employee_id)
}

/// Identifies a roster snapshot for cache keys. Any change to membership,
/// order or employee fields yields a different value.
pub fn fingerprint(roster: &[Employee]) -> u64 {
    let mut hasher = DefaultHasher::new();
    roster.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Employee {
        Employee::new("E1", "Alice", "Engineering", "alice@company.com")
    }

    #[test]
    fn fingerprint_tracks_membership_and_fields() {
        let base = vec![alice()];
        assert_eq!(fingerprint(&base), fingerprint(&[alice()]));

        let grown = vec![alice(), Employee::new("E2", "Bob", "Sales", "bob@company.com")];
        assert_ne!(fingerprint(&base), fingerprint(&grown));

        let moved = vec![Employee::new("E1", "Alice", "Sales", "alice@company.com")];
        assert_ne!(fingerprint(&base), fingerprint(&moved));
    }
}
