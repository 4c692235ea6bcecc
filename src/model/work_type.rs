use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkType {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Concreting")]
    pub work_name: String,

    #[schema(example = "m³")]
    pub unit: String,

    #[schema(example = "Structure")]
    pub parameter: String,

    pub is_active: bool,
}
