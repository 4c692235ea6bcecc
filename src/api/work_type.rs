use crate::{
    error::{AppError, db_error},
    model::work_type::WorkType,
    response,
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct WorkTypePayload {
    #[schema(example = "Concreting")]
    pub work_name: Option<String>,
    #[schema(example = "m³")]
    pub unit: Option<String>,
    #[schema(example = "Structure")]
    pub parameter: Option<String>,
}

const SELECT_WORK_TYPE: &str = "SELECT * FROM work_types WHERE id = ?";

/// List active work types
#[utoipa::path(
    get,
    path = "/api/work-types",
    responses(
        (status = 200, description = "Work types retrieved successfully", body = [WorkType]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "WorkTypes"
)]
pub async fn list_work_types(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let work_types = sqlx::query_as::<_, WorkType>(
        "SELECT * FROM work_types WHERE is_active = TRUE ORDER BY work_name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve work types"))?;

    Ok(response::ok(work_types, "Work types retrieved successfully"))
}

/// Get a single work type
#[utoipa::path(
    get,
    path = "/api/work-types/{id}",
    params(("id" = u64, Path, description = "Work type ID")),
    responses(
        (status = 200, description = "Work type retrieved successfully", body = WorkType),
        (status = 404, description = "Work type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "WorkTypes"
)]
pub async fn get_work_type(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let work_type =
        sqlx::query_as::<_, WorkType>("SELECT * FROM work_types WHERE id = ? AND is_active = TRUE")
            .bind(path.into_inner())
            .fetch_optional(pool.get_ref())
            .await
            .map_err(db_error("Failed to retrieve work type"))?;

    match work_type {
        Some(work_type) => Ok(response::ok(work_type, "Work type retrieved successfully")),
        None => Err(AppError::NotFound("Work type not found".to_string())),
    }
}

/// Create a work type
#[utoipa::path(
    post,
    path = "/api/work-types",
    request_body = WorkTypePayload,
    responses(
        (status = 201, description = "Work type created successfully", body = WorkType),
        (status = 400, description = "Work name and unit are required")
    ),
    security(("bearer_auth" = [])),
    tag = "WorkTypes"
)]
pub async fn create_work_type(
    pool: web::Data<MySqlPool>,
    payload: web::Json<WorkTypePayload>,
) -> Result<HttpResponse, AppError> {
    let (work_name, unit) = match (payload.work_name.as_deref(), payload.unit.as_deref()) {
        (Some(name), Some(unit)) if !name.trim().is_empty() && !unit.trim().is_empty() => {
            (name, unit)
        }
        _ => {
            return Err(AppError::Validation(
                "Work name and unit are required".to_string(),
            ));
        }
    };

    let result = sqlx::query("INSERT INTO work_types (work_name, unit, parameter) VALUES (?, ?, ?)")
        .bind(work_name)
        .bind(unit)
        .bind(payload.parameter.as_deref().unwrap_or("Structure"))
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to create work type"))?;

    let work_type = sqlx::query_as::<_, WorkType>(SELECT_WORK_TYPE)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create work type"))?;

    Ok(response::created(work_type, "Work type created successfully"))
}

/// Update a work type (full replace)
#[utoipa::path(
    put,
    path = "/api/work-types/{id}",
    params(("id" = u64, Path, description = "Work type ID")),
    request_body = WorkTypePayload,
    responses(
        (status = 200, description = "Work type updated successfully", body = WorkType),
        (status = 404, description = "Work type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "WorkTypes"
)]
pub async fn update_work_type(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<WorkTypePayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    sqlx::query("UPDATE work_types SET work_name = ?, unit = ?, parameter = ? WHERE id = ?")
        .bind(&payload.work_name)
        .bind(&payload.unit)
        .bind(&payload.parameter)
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to update work type"))?;

    let work_type = sqlx::query_as::<_, WorkType>(SELECT_WORK_TYPE)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update work type"))?;

    match work_type {
        Some(work_type) => Ok(response::ok(work_type, "Work type updated successfully")),
        None => Err(AppError::NotFound("Work type not found".to_string())),
    }
}

/// Soft-delete a work type
#[utoipa::path(
    delete,
    path = "/api/work-types/{id}",
    params(("id" = u64, Path, description = "Work type ID")),
    responses(
        (status = 200, description = "Work type deleted successfully"),
        (status = 404, description = "Work type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "WorkTypes"
)]
pub async fn delete_work_type(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let result =
        sqlx::query("UPDATE work_types SET is_active = FALSE WHERE id = ? AND is_active = TRUE")
            .bind(path.into_inner())
            .execute(pool.get_ref())
            .await
            .map_err(db_error("Failed to delete work type"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Work type not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "Work type deleted successfully",
    ))
}
