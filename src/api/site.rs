use crate::{
    error::{AppError, db_error},
    model::site::Site,
    response,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SitePayload {
    #[schema(example = "Riverside Apartments")]
    pub site_name: Option<String>,
    #[schema(example = "12 Canal Road")]
    pub site_address: Option<String>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

const SELECT_SITE: &str = "SELECT * FROM sites WHERE id = ?";

/// List all active sites
#[utoipa::path(
    get,
    path = "/api/sites",
    responses(
        (status = 200, description = "Sites retrieved successfully", body = [Site]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn list_sites(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let sites = sqlx::query_as::<_, Site>(
        "SELECT * FROM sites WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve sites"))?;

    Ok(response::ok(sites, "Sites retrieved successfully"))
}

/// Get a single site
#[utoipa::path(
    get,
    path = "/api/sites/{id}",
    params(("id" = u64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site retrieved successfully", body = Site),
        (status = 404, description = "Site not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn get_site(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = ? AND is_active = TRUE")
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to retrieve site"))?;

    match site {
        Some(site) => Ok(response::ok(site, "Site retrieved successfully")),
        None => Err(AppError::NotFound("Site not found".to_string())),
    }
}

/// Create a site
#[utoipa::path(
    post,
    path = "/api/sites",
    request_body = SitePayload,
    responses(
        (status = 201, description = "Site created successfully", body = Site),
        (status = 400, description = "Site name is required")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn create_site(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SitePayload>,
) -> Result<HttpResponse, AppError> {
    let site_name = match payload.site_name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(AppError::Validation("Site name is required".to_string())),
    };

    let result = sqlx::query(
        "INSERT INTO sites (site_name, site_address, start_date, notes) VALUES (?, ?, ?, ?)",
    )
    .bind(site_name)
    .bind(&payload.site_address)
    .bind(payload.start_date)
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("Failed to create site"))?;

    let site = sqlx::query_as::<_, Site>(SELECT_SITE)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create site"))?;

    Ok(response::created(site, "Site created successfully"))
}

/// Update a site (full replace)
#[utoipa::path(
    put,
    path = "/api/sites/{id}",
    params(("id" = u64, Path, description = "Site ID")),
    request_body = SitePayload,
    responses(
        (status = 200, description = "Site updated successfully", body = Site),
        (status = 404, description = "Site not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn update_site(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SitePayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    sqlx::query(
        "UPDATE sites SET site_name = ?, site_address = ?, start_date = ?, notes = ? WHERE id = ?",
    )
    .bind(&payload.site_name)
    .bind(&payload.site_address)
    .bind(payload.start_date)
    .bind(&payload.notes)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("Failed to update site"))?;

    let site = sqlx::query_as::<_, Site>(SELECT_SITE)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update site"))?;

    match site {
        Some(site) => Ok(response::ok(site, "Site updated successfully")),
        None => Err(AppError::NotFound("Site not found".to_string())),
    }
}

/// Soft-delete a site
#[utoipa::path(
    delete,
    path = "/api/sites/{id}",
    params(("id" = u64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site deleted successfully"),
        (status = 404, description = "Site not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn delete_site(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    // Re-deleting an inactive site matches zero rows and reports 404.
    let result = sqlx::query("UPDATE sites SET is_active = FALSE WHERE id = ? AND is_active = TRUE")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to delete site"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Site not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "Site deleted successfully",
    ))
}

/// Per-site operational stats
#[utoipa::path(
    get,
    path = "/api/sites/{id}/stats",
    params(("id" = u64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site stats retrieved successfully"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn site_stats(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let fail = db_error("Failed to retrieve site stats");

    let staff_total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM staff WHERE site_id = ? AND is_active = TRUE",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(&fail)?;

    let inventory_total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory WHERE site_id = ?")
            .bind(id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(&fail)?;

    let recent_dpr = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM dpr WHERE site_id = ? AND date >= CURDATE() - INTERVAL 7 DAY",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(&fail)?;

    let today_attendance = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE site_id = ? AND date = CURDATE()",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(&fail)?;

    Ok(response::ok(
        json!({
            "total_staff": staff_total,
            "total_inventory_entries": inventory_total,
            "recent_dpr_entries": recent_dpr,
            "today_attendance": today_attendance,
        }),
        "Site stats retrieved successfully",
    ))
}
