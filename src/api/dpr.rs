use crate::{
    error::{AppError, db_error},
    model::dpr::{DprRow, DprSummaryRow, StructureProgressRow},
    response,
    utils::db_utils::{QueryFilters, SqlValue, bind_values, bind_values_as},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct DprFilter {
    /// Filter by site
    pub site_id: Option<u64>,
    /// Filter by work type
    pub work_type_id: Option<u64>,
    /// Exact date
    #[param(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    /// Range start (inclusive)
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive)
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct DprPayload {
    pub site_id: Option<u64>,
    pub work_type_id: Option<u64>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[schema(example = "Block A")]
    pub structure_name: Option<String>,
    #[schema(example = 12.5)]
    pub quantity: Option<f64>,
    pub remarks: Option<String>,
    /// Stored path of an uploaded photo, if any.
    pub photo: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct DprSummaryQuery {
    pub site_id: Option<u64>,
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
pub struct ProgressQuery {
    pub site_id: Option<u64>,
    pub work_type_id: Option<u64>,
}

const SELECT_DPR: &str = r#"
    SELECT d.*, s.site_name, w.work_name, w.unit
    FROM dpr d
    INNER JOIN sites s ON d.site_id = s.id
    INNER JOIN work_types w ON d.work_type_id = w.id
    WHERE d.id = ?
"#;

/// List daily progress reports
#[utoipa::path(
    get,
    path = "/api/dpr",
    params(DprFilter),
    responses(
        (status = 200, description = "DPR retrieved successfully", body = [DprRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn list_dpr(
    pool: web::Data<MySqlPool>,
    query: web::Query<DprFilter>,
) -> Result<HttpResponse, AppError> {
    let mut filters = QueryFilters::new();
    if let Some(site_id) = query.site_id {
        filters.push("d.site_id = ?", site_id);
    }
    if let Some(work_type_id) = query.work_type_id {
        filters.push("d.work_type_id = ?", work_type_id);
    }
    if let Some(date) = query.date {
        filters.push("d.date = ?", date);
    }
    if let Some(start_date) = query.start_date {
        filters.push("d.date >= ?", start_date);
    }
    if let Some(end_date) = query.end_date {
        filters.push("d.date <= ?", end_date);
    }

    let sql = format!(
        r#"
        SELECT d.*, s.site_name, w.work_name, w.unit
        FROM dpr d
        INNER JOIN sites s ON d.site_id = s.id
        INNER JOIN work_types w ON d.work_type_id = w.id
        {}
        ORDER BY d.date DESC, d.created_at DESC
        "#,
        filters.where_clause()
    );

    let dpr = bind_values_as(sqlx::query_as::<_, DprRow>(&sql), filters.into_values())
        .fetch_all(pool.get_ref())
        .await
        .map_err(db_error("Failed to retrieve DPR"))?;

    Ok(response::ok(dpr, "DPR retrieved successfully"))
}

/// Get a single daily progress report
#[utoipa::path(
    get,
    path = "/api/dpr/{id}",
    params(("id" = u64, Path, description = "DPR ID")),
    responses(
        (status = 200, description = "DPR retrieved successfully", body = DprRow),
        (status = 404, description = "DPR not found")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn get_dpr(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let dpr = sqlx::query_as::<_, DprRow>(SELECT_DPR)
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to retrieve DPR"))?;

    match dpr {
        Some(row) => Ok(response::ok(row, "DPR retrieved successfully")),
        None => Err(AppError::NotFound("DPR not found".to_string())),
    }
}

/// Create a daily progress report
#[utoipa::path(
    post,
    path = "/api/dpr",
    request_body = DprPayload,
    responses(
        (status = 201, description = "DPR created successfully", body = DprRow),
        (status = 400, description = "Missing required fields")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn create_dpr(
    pool: web::Data<MySqlPool>,
    payload: web::Json<DprPayload>,
) -> Result<HttpResponse, AppError> {
    let (site_id, work_type_id, date, structure_name, quantity) = match (
        payload.site_id,
        payload.work_type_id,
        payload.date,
        payload.structure_name.as_deref(),
        payload.quantity,
    ) {
        (Some(site_id), Some(work_type_id), Some(date), Some(structure_name), Some(quantity))
            if !structure_name.trim().is_empty() =>
        {
            (site_id, work_type_id, date, structure_name, quantity)
        }
        _ => {
            return Err(AppError::Validation(
                "Site, work type, date, structure name, and quantity are required".to_string(),
            ));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO dpr (site_id, work_type_id, date, structure_name, quantity, remarks, photo)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(site_id)
    .bind(work_type_id)
    .bind(date)
    .bind(structure_name)
    .bind(quantity)
    .bind(&payload.remarks)
    .bind(&payload.photo)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("Failed to create DPR"))?;

    let dpr = sqlx::query_as::<_, DprRow>(SELECT_DPR)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create DPR"))?;

    Ok(response::created(dpr, "DPR created successfully"))
}

/// Update a daily progress report (full replace; photo kept unless re-supplied)
#[utoipa::path(
    put,
    path = "/api/dpr/{id}",
    params(("id" = u64, Path, description = "DPR ID")),
    request_body = DprPayload,
    responses(
        (status = 200, description = "DPR updated successfully", body = DprRow),
        (status = 404, description = "DPR not found")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn update_dpr(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DprPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut sql = String::from(
        "UPDATE dpr SET site_id = ?, work_type_id = ?, date = ?, structure_name = ?, quantity = ?, remarks = ?",
    );
    let mut values: Vec<SqlValue> = vec![
        payload.site_id.into(),
        payload.work_type_id.into(),
        payload.date.into(),
        payload.structure_name.clone().into(),
        payload.quantity.into(),
        payload.remarks.clone().into(),
    ];

    if let Some(photo) = &payload.photo {
        sql.push_str(", photo = ?");
        values.push(photo.as_str().into());
    }

    sql.push_str(" WHERE id = ?");
    values.push(id.into());

    bind_values(sqlx::query(&sql), values)
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to update DPR"))?;

    let dpr = sqlx::query_as::<_, DprRow>(SELECT_DPR)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update DPR"))?;

    match dpr {
        Some(row) => Ok(response::ok(row, "DPR updated successfully")),
        None => Err(AppError::NotFound("DPR not found".to_string())),
    }
}

/// Delete a daily progress report
#[utoipa::path(
    delete,
    path = "/api/dpr/{id}",
    params(("id" = u64, Path, description = "DPR ID")),
    responses(
        (status = 200, description = "DPR deleted successfully"),
        (status = 404, description = "DPR not found")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn delete_dpr(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let result = sqlx::query("DELETE FROM dpr WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to delete DPR"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("DPR not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "DPR deleted successfully",
    ))
}

/// Per-work-type totals for a site, optionally bounded by a date range
#[utoipa::path(
    get,
    path = "/api/dpr/summary/report",
    params(DprSummaryQuery),
    responses(
        (status = 200, description = "DPR summary retrieved successfully", body = [DprSummaryRow]),
        (status = 400, description = "Site ID is required")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn dpr_summary(
    pool: web::Data<MySqlPool>,
    query: web::Query<DprSummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(site_id) = query.site_id else {
        return Err(AppError::Validation("Site ID is required".to_string()));
    };

    let mut filters = QueryFilters::new();
    filters.push("d.site_id = ?", site_id);
    if let Some(start_date) = query.start_date {
        filters.push("d.date >= ?", start_date);
    }
    if let Some(end_date) = query.end_date {
        filters.push("d.date <= ?", end_date);
    }

    let sql = format!(
        r#"
        SELECT
            w.work_name,
            w.unit,
            SUM(d.quantity) as total_quantity,
            COUNT(d.id) as entry_count
        FROM dpr d
        INNER JOIN work_types w ON d.work_type_id = w.id
        {}
        GROUP BY d.work_type_id, w.work_name, w.unit
        ORDER BY w.work_name
        "#,
        filters.where_clause()
    );

    let summary = bind_values_as(
        sqlx::query_as::<_, DprSummaryRow>(&sql),
        filters.into_values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve DPR summary"))?;

    Ok(response::ok(summary, "DPR summary retrieved successfully"))
}

/// Cumulative quantity per structure for one work type at one site
#[utoipa::path(
    get,
    path = "/api/dpr/cumulative/progress",
    params(ProgressQuery),
    responses(
        (status = 200, description = "Cumulative progress retrieved successfully", body = [StructureProgressRow]),
        (status = 400, description = "Site ID and work type ID are required")
    ),
    security(("bearer_auth" = [])),
    tag = "DPR"
)]
pub async fn cumulative_progress(
    pool: web::Data<MySqlPool>,
    query: web::Query<ProgressQuery>,
) -> Result<HttpResponse, AppError> {
    let (site_id, work_type_id) = match (query.site_id, query.work_type_id) {
        (Some(site_id), Some(work_type_id)) => (site_id, work_type_id),
        _ => {
            return Err(AppError::Validation(
                "Site ID and work type ID are required".to_string(),
            ));
        }
    };

    let progress = sqlx::query_as::<_, StructureProgressRow>(
        r#"
        SELECT
            structure_name,
            SUM(quantity) as total_quantity
        FROM dpr
        WHERE site_id = ? AND work_type_id = ?
        GROUP BY structure_name
        ORDER BY structure_name
        "#,
    )
    .bind(site_id)
    .bind(work_type_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve cumulative progress"))?;

    Ok(response::ok(
        progress,
        "Cumulative progress retrieved successfully",
    ))
}
