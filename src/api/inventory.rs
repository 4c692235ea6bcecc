use crate::{
    error::{AppError, db_error},
    model::inventory::{InventoryRow, MovementType, StockRow},
    response,
    utils::db_utils::{QueryFilters, SqlValue, bind_values, bind_values_as},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct InventoryFilter {
    /// Filter by site
    pub site_id: Option<u64>,
    /// Filter by movement direction
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    /// Range start (inclusive)
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive)
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct InventoryPayload {
    pub site_id: Option<u64>,
    #[schema(example = "Cement")]
    pub material_name: Option<String>,
    #[schema(example = 100.0)]
    pub quantity: Option<f64>,
    #[schema(example = "Incoming")]
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Stored path of an uploaded receipt image, if any.
    pub receipt_image: Option<String>,
}

const SELECT_INVENTORY: &str = r#"
    SELECT i.*, s.site_name
    FROM inventory i
    INNER JOIN sites s ON i.site_id = s.id
    WHERE i.id = ?
"#;

/// List inventory movements
#[utoipa::path(
    get,
    path = "/api/inventory",
    params(InventoryFilter),
    responses(
        (status = 200, description = "Inventory retrieved successfully", body = [InventoryRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_inventory(
    pool: web::Data<MySqlPool>,
    query: web::Query<InventoryFilter>,
) -> Result<HttpResponse, AppError> {
    let mut filters = QueryFilters::new();
    if let Some(site_id) = query.site_id {
        filters.push("i.site_id = ?", site_id);
    }
    if let Some(movement_type) = query.movement_type {
        filters.push("i.type = ?", movement_type.to_string());
    }
    if let Some(start_date) = query.start_date {
        filters.push("i.date >= ?", start_date);
    }
    if let Some(end_date) = query.end_date {
        filters.push("i.date <= ?", end_date);
    }

    let sql = format!(
        r#"
        SELECT i.*, s.site_name
        FROM inventory i
        INNER JOIN sites s ON i.site_id = s.id
        {}
        ORDER BY i.date DESC, i.created_at DESC
        "#,
        filters.where_clause()
    );

    let inventory = bind_values_as(
        sqlx::query_as::<_, InventoryRow>(&sql),
        filters.into_values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve inventory"))?;

    Ok(response::ok(inventory, "Inventory retrieved successfully"))
}

/// Get a single inventory movement
#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    params(("id" = u64, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory retrieved successfully", body = InventoryRow),
        (status = 404, description = "Inventory not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn get_inventory(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let inventory = sqlx::query_as::<_, InventoryRow>(SELECT_INVENTORY)
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to retrieve inventory"))?;

    match inventory {
        Some(row) => Ok(response::ok(row, "Inventory retrieved successfully")),
        None => Err(AppError::NotFound("Inventory not found".to_string())),
    }
}

/// Record a material movement
#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = InventoryPayload,
    responses(
        (status = 201, description = "Inventory created successfully", body = InventoryRow),
        (status = 400, description = "Missing required fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_inventory(
    pool: web::Data<MySqlPool>,
    payload: web::Json<InventoryPayload>,
) -> Result<HttpResponse, AppError> {
    let (site_id, material_name, quantity, movement_type, date) = match (
        payload.site_id,
        payload.material_name.as_deref(),
        payload.quantity,
        payload.movement_type,
        payload.date,
    ) {
        (Some(site_id), Some(material_name), Some(quantity), Some(movement_type), Some(date))
            if !material_name.trim().is_empty() =>
        {
            (site_id, material_name, quantity, movement_type, date)
        }
        _ => {
            return Err(AppError::Validation(
                "Site, material name, quantity, type, and date are required".to_string(),
            ));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO inventory (site_id, material_name, quantity, type, date, description, receipt_image)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(site_id)
    .bind(material_name)
    .bind(quantity)
    .bind(movement_type.to_string())
    .bind(date)
    .bind(&payload.description)
    .bind(&payload.receipt_image)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("Failed to create inventory"))?;

    let inventory = sqlx::query_as::<_, InventoryRow>(SELECT_INVENTORY)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create inventory"))?;

    Ok(response::created(inventory, "Inventory created successfully"))
}

/// Update a material movement (full replace; receipt kept unless re-supplied)
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = u64, Path, description = "Inventory ID")),
    request_body = InventoryPayload,
    responses(
        (status = 200, description = "Inventory updated successfully", body = InventoryRow),
        (status = 404, description = "Inventory not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn update_inventory(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<InventoryPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut sql = String::from(
        "UPDATE inventory SET site_id = ?, material_name = ?, quantity = ?, type = ?, date = ?, description = ?",
    );
    let mut values: Vec<SqlValue> = vec![
        payload.site_id.into(),
        payload.material_name.clone().into(),
        payload.quantity.into(),
        payload.movement_type.map(|t| t.to_string()).into(),
        payload.date.into(),
        payload.description.clone().into(),
    ];

    if let Some(receipt_image) = &payload.receipt_image {
        sql.push_str(", receipt_image = ?");
        values.push(receipt_image.as_str().into());
    }

    sql.push_str(" WHERE id = ?");
    values.push(id.into());

    bind_values(sqlx::query(&sql), values)
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to update inventory"))?;

    let inventory = sqlx::query_as::<_, InventoryRow>(SELECT_INVENTORY)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update inventory"))?;

    match inventory {
        Some(row) => Ok(response::ok(row, "Inventory updated successfully")),
        None => Err(AppError::NotFound("Inventory not found".to_string())),
    }
}

/// Delete a material movement
#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = u64, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory deleted successfully"),
        (status = 404, description = "Inventory not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn delete_inventory(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to delete inventory"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Inventory not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "Inventory deleted successfully",
    ))
}

/// Per-material stock position for a site
#[utoipa::path(
    get,
    path = "/api/inventory/summary/{site_id}",
    params(("site_id" = u64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Inventory summary retrieved successfully", body = [StockRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn inventory_summary(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let summary = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT
            material_name,
            SUM(CASE WHEN type = 'Incoming' THEN quantity ELSE 0 END) as total_incoming,
            SUM(CASE WHEN type = 'Outgoing' THEN quantity ELSE 0 END) as total_outgoing,
            (SUM(CASE WHEN type = 'Incoming' THEN quantity ELSE 0 END) -
             SUM(CASE WHEN type = 'Outgoing' THEN quantity ELSE 0 END)) as current_stock
        FROM inventory
        WHERE site_id = ?
        GROUP BY material_name
        ORDER BY material_name
        "#,
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve inventory summary"))?;

    Ok(response::ok(
        summary,
        "Inventory summary retrieved successfully",
    ))
}
