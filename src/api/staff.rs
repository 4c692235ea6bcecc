use crate::{
    error::{AppError, db_error},
    model::staff::StaffRow,
    response,
    utils::db_utils::{QueryFilters, bind_values_as},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct StaffFilter {
    /// Filter by assigned site
    pub site_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct StaffPayload {
    #[schema(example = "Ramesh Kumar")]
    pub staff_name: Option<String>,
    #[schema(example = "Mason")]
    pub role: Option<String>,
    pub phone: Option<String>,
    pub site_id: Option<u64>,
}

const SELECT_STAFF: &str = r#"
    SELECT s.*, st.site_name
    FROM staff s
    LEFT JOIN sites st ON s.site_id = st.id
    WHERE s.id = ?
"#;

/// List active staff, optionally scoped to a site
#[utoipa::path(
    get,
    path = "/api/staff",
    params(StaffFilter),
    responses(
        (status = 200, description = "Staff retrieved successfully", body = [StaffRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    pool: web::Data<MySqlPool>,
    query: web::Query<StaffFilter>,
) -> Result<HttpResponse, AppError> {
    let mut filters = QueryFilters::new();
    if let Some(site_id) = query.site_id {
        filters.push("s.site_id = ?", site_id);
    }

    let sql = format!(
        r#"
        SELECT s.*, st.site_name
        FROM staff s
        LEFT JOIN sites st ON s.site_id = st.id
        WHERE s.is_active = TRUE{}
        ORDER BY s.created_at DESC
        "#,
        filters.and_clause()
    );

    let staff = bind_values_as(
        sqlx::query_as::<_, StaffRow>(&sql),
        filters.into_values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve staff"))?;

    Ok(response::ok(staff, "Staff retrieved successfully"))
}

/// Get a single staff member
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff retrieved successfully", body = StaffRow),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn get_staff(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let staff = sqlx::query_as::<_, StaffRow>(
        r#"
        SELECT s.*, st.site_name
        FROM staff s
        LEFT JOIN sites st ON s.site_id = st.id
        WHERE s.id = ? AND s.is_active = TRUE
        "#,
    )
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve staff"))?;

    match staff {
        Some(staff) => Ok(response::ok(staff, "Staff retrieved successfully")),
        None => Err(AppError::NotFound("Staff not found".to_string())),
    }
}

/// Create a staff member
#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = StaffPayload,
    responses(
        (status = 201, description = "Staff created successfully", body = StaffRow),
        (status = 400, description = "Staff name and role are required")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn create_staff(
    pool: web::Data<MySqlPool>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    let (staff_name, role) = match (payload.staff_name.as_deref(), payload.role.as_deref()) {
        (Some(name), Some(role)) if !name.trim().is_empty() && !role.trim().is_empty() => {
            (name, role)
        }
        _ => {
            return Err(AppError::Validation(
                "Staff name and role are required".to_string(),
            ));
        }
    };

    let result =
        sqlx::query("INSERT INTO staff (staff_name, role, phone, site_id) VALUES (?, ?, ?, ?)")
            .bind(staff_name)
            .bind(role)
            .bind(&payload.phone)
            .bind(payload.site_id)
            .execute(pool.get_ref())
            .await
            .map_err(db_error("Failed to create staff"))?;

    let staff = sqlx::query_as::<_, StaffRow>(SELECT_STAFF)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create staff"))?;

    Ok(response::created(staff, "Staff created successfully"))
}

/// Update a staff member (full replace)
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    request_body = StaffPayload,
    responses(
        (status = 200, description = "Staff updated successfully", body = StaffRow),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_staff(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    sqlx::query("UPDATE staff SET staff_name = ?, role = ?, phone = ?, site_id = ? WHERE id = ?")
        .bind(&payload.staff_name)
        .bind(&payload.role)
        .bind(&payload.phone)
        .bind(payload.site_id)
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to update staff"))?;

    let staff = sqlx::query_as::<_, StaffRow>(SELECT_STAFF)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update staff"))?;

    match staff {
        Some(staff) => Ok(response::ok(staff, "Staff updated successfully")),
        None => Err(AppError::NotFound("Staff not found".to_string())),
    }
}

/// Soft-delete a staff member
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff deleted successfully"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn delete_staff(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let result =
        sqlx::query("UPDATE staff SET is_active = FALSE WHERE id = ? AND is_active = TRUE")
            .bind(path.into_inner())
            .execute(pool.get_ref())
            .await
            .map_err(db_error("Failed to delete staff"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Staff not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "Staff deleted successfully",
    ))
}
