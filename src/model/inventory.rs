use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Direction of a material movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum MovementType {
    Incoming,
    Outgoing,
}

/// Inventory row joined with its site label.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct InventoryRow {
    #[schema(example = 1)]
    pub id: u64,

    pub site_id: u64,

    #[schema(example = "Cement")]
    pub material_name: String,

    #[schema(example = 100.0)]
    pub quantity: f64,

    #[schema(example = "Incoming")]
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub description: Option<String>,

    #[schema(example = "uploads/receipts/1704067200.jpg", nullable = true)]
    pub receipt_image: Option<String>,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "Riverside Apartments")]
    pub site_name: String,
}

/// Per-material stock position. `current_stock` may legitimately go negative
/// when outgoing entries outrun recorded deliveries.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct StockRow {
    #[schema(example = "Cement")]
    pub material_name: String,
    #[schema(example = 100.0)]
    pub total_incoming: f64,
    #[schema(example = 30.0)]
    pub total_outgoing: f64,
    #[schema(example = 70.0)]
    pub current_stock: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn movement_type_round_trips() {
        assert_eq!(MovementType::Incoming.to_string(), "Incoming");
        assert_eq!(
            MovementType::from_str("Outgoing").unwrap(),
            MovementType::Outgoing
        );
        assert!(serde_json::from_str::<MovementType>("\"Sideways\"").is_err());
    }
}
