use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Site {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Riverside Apartments")]
    pub site_name: String,

    #[schema(example = "12 Canal Road", nullable = true)]
    pub site_address: Option<String>,

    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,

    pub notes: Option<String>,

    pub is_active: bool,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// The subset of site columns the global dashboard lists.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct SiteBrief {
    pub id: u64,
    pub site_name: String,
    pub site_address: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
}
