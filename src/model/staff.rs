use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Staff row joined with its (optional) site label. Staff may be unassigned,
/// hence the LEFT JOIN and the nullable site columns.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StaffRow {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Ramesh Kumar")]
    pub staff_name: String,

    #[schema(example = "Mason")]
    pub role: String,

    #[schema(example = "+911234567890", nullable = true)]
    pub phone: Option<String>,

    pub site_id: Option<u64>,

    pub is_active: bool,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "Riverside Apartments", nullable = true)]
    pub site_name: Option<String>,
}

/// Roster entry for the per-site dashboard.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct StaffBrief {
    pub id: u64,
    pub staff_name: String,
    pub role: String,
    pub phone: Option<String>,
}
