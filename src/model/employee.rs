use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roster entry as supplied by the roster collaborator. Never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP001",
        "name": "John Doe",
        "department": "Engineering",
        "email": "john.doe@company.com"
    })
)]
pub struct Employee {
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,
}

impl Employee {
    pub fn new(
        employee_id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            department: department.into(),
            email: email.into(),
        }
    }
}
