use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Stored attendance status. Only these two values are ever persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Status of an employee on a given day as seen by derived views.
/// `Unmarked` is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, ToSchema)]
pub enum DayStatus {
    Present,
    Absent,
    Unmarked,
}

impl From<AttendanceStatus> for DayStatus {
    fn from(value: AttendanceStatus) -> Self {
        match value {
            AttendanceStatus::Present => DayStatus::Present,
            AttendanceStatus::Absent => DayStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": "EMP001",
    "date": "2024-01-10",
    "status": "Present",
    "updated_at": "2024-01-10T09:00:00Z"
}))]
pub struct AttendanceRecord {
    pub employee_id: String,

    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    /// Time of the last mark for this key.
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            status,
            updated_at: Utc::now(),
        }
    }

    /// Equality on stored content, ignoring when the mark happened.
    pub fn same_content(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id
            && self.date == other.date
            && self.status == other.status
    }
}

/// Optional constraints for listing raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub employee_id: Option<String>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.date.is_none_or(|d| record.date == d)
            && self
                .employee_id
                .as_deref()
                .is_none_or(|id| record.employee_id == id)
            && self.status.is_none_or(|s| record.status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn status_parses_only_canonical_names() {
        assert_eq!(
            AttendanceStatus::from_str("Present").unwrap(),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::from_str("Absent").unwrap(),
            AttendanceStatus::Absent
        );
        assert!(AttendanceStatus::from_str("present").is_err());
        assert!(AttendanceStatus::from_str("Unmarked").is_err());
        assert!(AttendanceStatus::from_str("").is_err());
    }

    #[test]
    fn status_serializes_with_variant_name() {
        let json = serde_json::to_string(&DayStatus::Unmarked).unwrap();
        assert_eq!(json, "\"Unmarked\"");
        assert_eq!(AttendanceStatus::Absent.as_ref(), "Absent");
    }

    #[test]
    fn same_content_ignores_timestamp() {
        let a = AttendanceRecord::new("EMP001", day(10), AttendanceStatus::Present);
        let mut b = a.clone();
        b.updated_at = a.updated_at + chrono::Duration::seconds(30);
        assert!(a.same_content(&b));

        b.status = AttendanceStatus::Absent;
        assert!(!a.same_content(&b));
    }

    #[test]
    fn filter_combines_all_constraints() {
        let record = AttendanceRecord::new("EMP001", day(10), AttendanceStatus::Present);

        assert!(AttendanceFilter::default().matches(&record));
        assert!(
            AttendanceFilter {
                date: Some(day(10)),
                employee_id: Some("EMP001".into()),
                status: Some(AttendanceStatus::Present),
            }
            .matches(&record)
        );
        assert!(
            !AttendanceFilter {
                date: Some(day(11)),
                ..Default::default()
            }
            .matches(&record)
        );
        assert!(
            !AttendanceFilter {
                status: Some(AttendanceStatus::Absent),
                ..Default::default()
            }
            .matches(&record)
        );
    }
}
