use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Daily progress report row joined with site and work-type labels.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DprRow {
    #[schema(example = 1)]
    pub id: u64,

    pub site_id: u64,

    pub work_type_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Block A")]
    pub structure_name: String,

    #[schema(example = 12.5)]
    pub quantity: f64,

    pub remarks: Option<String>,

    pub photo: Option<String>,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "Riverside Apartments")]
    pub site_name: String,

    #[schema(example = "Concreting")]
    pub work_name: String,

    #[schema(example = "m³")]
    pub unit: String,
}

/// Per-work-type totals for the summary report.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct DprSummaryRow {
    #[schema(example = "Concreting")]
    pub work_name: String,
    #[schema(example = "m³")]
    pub unit: String,
    #[schema(example = 120.5)]
    pub total_quantity: f64,
    #[schema(example = 8)]
    pub entry_count: i64,
}

/// Per-structure cumulative quantity for one work type at one site.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct StructureProgressRow {
    #[schema(example = "Block A")]
    pub structure_name: String,
    #[schema(example = 15.0)]
    pub total_quantity: f64,
}
