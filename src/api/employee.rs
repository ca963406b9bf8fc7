use super::attendance::roster_snapshot;
use crate::config::Config;
use crate::error::AttendanceError;
use crate::model::employee::Employee;
use crate::models::{ApiResponse, RosterQuery};
use crate::roster::RosterSource;
use actix_web::{HttpResponse, web};

fn matches_query(employee: &Employee, query: &RosterQuery) -> bool {
    let department_ok = query
        .department
        .as_deref()
        .filter(|d| !d.is_empty())
        .is_none_or(|d| employee.department == d);

    let search_ok = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .is_none_or(|needle| {
            [&employee.name, &employee.email, &employee.employee_id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });

    department_ok && search_ok
}

/// List roster employees (read-only)
#[utoipa::path(
    get,
    path = "/api/employees",
    params(RosterQuery),
    responses(
        (status = 200, description = "Roster in display order", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    roster: web::Data<dyn RosterSource>,
    config: web::Data<Config>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let employees: Vec<Employee> = roster_snapshot(roster.get_ref(), &config)
        .await?
        .into_iter()
        .filter(|e| matches_query(e, &query))
        .collect();

    Ok(ApiResponse::ok("Employees retrieved successfully.", employees))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: Option<&str>, department: Option<&str>) -> RosterQuery {
        RosterQuery {
            search: search.map(str::to_string),
            department: department.map(str::to_string),
        }
    }

    #[test]
    fn search_is_case_insensitive_over_name_email_and_id() {
        let alice = Employee::new("EMP001", "Alice Smith", "Engineering", "alice@company.com");

        assert!(matches_query(&alice, &query(None, None)));
        assert!(matches_query(&alice, &query(Some("SMITH"), None)));
        assert!(matches_query(&alice, &query(Some("emp001"), None)));
        assert!(matches_query(&alice, &query(Some("@company"), None)));
        assert!(!matches_query(&alice, &query(Some("bob"), None)));
    }

    #[test]
    fn department_must_match_exactly() {
        let alice = Employee::new("EMP001", "Alice Smith", "Engineering", "alice@company.com");

        assert!(matches_query(&alice, &query(None, Some("Engineering"))));
        assert!(!matches_query(&alice, &query(None, Some("Sales"))));
        assert!(!matches_query(&alice, &query(Some("alice"), Some("Sales"))));
    }
}
