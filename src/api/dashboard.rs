use crate::{
    error::{AppError, db_error},
    model::{
        dpr::DprRow,
        inventory::InventoryRow,
        site::{Site, SiteBrief},
        staff::StaffBrief,
    },
    response,
};
use actix_web::{HttpResponse, web};
use futures::try_join;
use serde_json::json;
use sqlx::MySqlPool;

/// Global overview: live counts plus the most recent activity.
///
/// The reads run concurrently on separate pooled connections; each is a
/// point-in-time snapshot with no isolation across them.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard data retrieved successfully"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_dashboard(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let (
        total_sites,
        total_staff,
        recent_inventory_entries,
        recent_dpr_entries,
        today_attendance,
        recent_dpr,
        recent_inventory,
        active_sites,
    ) = try_join!(
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sites WHERE is_active = TRUE")
            .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE is_active = TRUE")
            .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory WHERE date >= CURDATE() - INTERVAL 30 DAY"
        )
        .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM dpr WHERE date >= CURDATE() - INTERVAL 7 DAY"
        )
        .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE date = CURDATE()")
            .fetch_one(pool.get_ref()),
        sqlx::query_as::<_, DprRow>(
            r#"
            SELECT d.*, s.site_name, w.work_name, w.unit
            FROM dpr d
            INNER JOIN sites s ON d.site_id = s.id
            INNER JOIN work_types w ON d.work_type_id = w.id
            ORDER BY d.created_at DESC
            LIMIT 10
            "#,
        )
        .fetch_all(pool.get_ref()),
        sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT i.*, s.site_name
            FROM inventory i
            INNER JOIN sites s ON i.site_id = s.id
            ORDER BY i.created_at DESC
            LIMIT 10
            "#,
        )
        .fetch_all(pool.get_ref()),
        sqlx::query_as::<_, SiteBrief>(
            r#"
            SELECT id, site_name, site_address, start_date
            FROM sites
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool.get_ref()),
    )
    .map_err(db_error("Failed to retrieve dashboard data"))?;

    Ok(response::ok(
        json!({
            "stats": {
                "total_sites": total_sites,
                "total_staff": total_staff,
                "recent_inventory_entries": recent_inventory_entries,
                "recent_dpr_entries": recent_dpr_entries,
                "today_attendance": today_attendance,
            },
            "recent_dpr": recent_dpr,
            "recent_inventory": recent_inventory,
            "active_sites": active_sites,
        }),
        "Dashboard data retrieved successfully",
    ))
}

/// Per-site overview
#[utoipa::path(
    get,
    path = "/api/dashboard/site/{site_id}",
    params(("site_id" = u64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site dashboard retrieved successfully"),
        (status = 404, description = "Site not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_site_dashboard(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let site_id = path.into_inner();
    let fail = db_error("Failed to retrieve site dashboard");

    let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = ? AND is_active = TRUE")
        .bind(site_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(&fail)?;

    let Some(site) = site else {
        return Err(AppError::NotFound("Site not found".to_string()));
    };

    let (
        total_staff,
        total_inventory_entries,
        total_dpr_entries,
        today_present,
        recent_dpr,
        recent_inventory,
        staff,
    ) = try_join!(
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM staff WHERE site_id = ? AND is_active = TRUE"
        )
        .bind(site_id)
        .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory WHERE site_id = ?")
            .bind(site_id)
            .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dpr WHERE site_id = ?")
            .bind(site_id)
            .fetch_one(pool.get_ref()),
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE site_id = ? AND date = CURDATE() AND status = 'Present'"
        )
        .bind(site_id)
        .fetch_one(pool.get_ref()),
        sqlx::query_as::<_, DprRow>(
            r#"
            SELECT d.*, s.site_name, w.work_name, w.unit
            FROM dpr d
            INNER JOIN sites s ON d.site_id = s.id
            INNER JOIN work_types w ON d.work_type_id = w.id
            WHERE d.site_id = ?
            ORDER BY d.date DESC, d.created_at DESC
            LIMIT 5
            "#,
        )
        .bind(site_id)
        .fetch_all(pool.get_ref()),
        sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT i.*, s.site_name
            FROM inventory i
            INNER JOIN sites s ON i.site_id = s.id
            WHERE i.site_id = ?
            ORDER BY i.date DESC, i.created_at DESC
            LIMIT 5
            "#,
        )
        .bind(site_id)
        .fetch_all(pool.get_ref()),
        sqlx::query_as::<_, StaffBrief>(
            "SELECT id, staff_name, role, phone FROM staff WHERE site_id = ? AND is_active = TRUE",
        )
        .bind(site_id)
        .fetch_all(pool.get_ref()),
    )
    .map_err(&fail)?;

    Ok(response::ok(
        json!({
            "site": site,
            "stats": {
                "total_staff": total_staff,
                "total_inventory_entries": total_inventory_entries,
                "total_dpr_entries": total_dpr_entries,
                "today_present": today_present,
            },
            "recent_dpr": recent_dpr,
            "recent_inventory": recent_inventory,
            "staff": staff,
        }),
        "Site dashboard retrieved successfully",
    ))
}
