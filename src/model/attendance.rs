use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Attendance row joined with staff and site labels.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRow {
    #[schema(example = 1)]
    pub id: u64,

    pub staff_id: u64,

    pub site_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: String,

    pub notes: Option<String>,

    #[schema(example = "uploads/attendance/1704067200.jpg", nullable = true)]
    pub photo: Option<String>,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "Ramesh Kumar")]
    pub staff_name: String,

    #[schema(example = "Mason")]
    pub role: String,

    #[schema(example = "Riverside Apartments")]
    pub site_name: String,
}

/// One bucket of the per-status summary.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct StatusCount {
    #[schema(example = "Present")]
    pub status: String,
    #[schema(example = 12)]
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serializes_as_title_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"Present\""
        );
        assert_eq!(AttendanceStatus::Absent.to_string(), "Absent");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"Late\"").is_err());
        assert!(AttendanceStatus::from_str("Present").is_ok());
    }
}
