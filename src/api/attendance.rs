use crate::{
    db,
    error::{AppError, db_error},
    model::attendance::{AttendanceRow, AttendanceStatus, StatusCount},
    response,
    utils::db_utils::{QueryFilters, SqlValue, bind_values, bind_values_as},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct AttendanceFilter {
    /// Filter by site
    pub site_id: Option<u64>,
    /// Filter by staff member
    pub staff_id: Option<u64>,
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
pub struct AttendancePayload {
    pub staff_id: Option<u64>,
    pub site_id: Option<u64>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[schema(example = "Present")]
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
    /// Stored path of an uploaded photo, if any.
    pub photo: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct BulkEntry {
    pub staff_id: u64,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct BulkAttendancePayload {
    pub site_id: Option<u64>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub attendances: Option<Vec<BulkEntry>>,
}

#[derive(Deserialize, IntoParams)]
pub struct SummaryQuery {
    pub site_id: Option<u64>,
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

const SELECT_ATTENDANCE: &str = r#"
    SELECT a.*, s.staff_name, s.role, st.site_name
    FROM attendance a
    INNER JOIN staff s ON a.staff_id = s.id
    INNER JOIN sites st ON a.site_id = st.id
    WHERE a.id = ?
"#;

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance retrieved successfully", body = [AttendanceRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let mut filters = QueryFilters::new();
    if let Some(site_id) = query.site_id {
        filters.push("a.site_id = ?", site_id);
    }
    if let Some(staff_id) = query.staff_id {
        filters.push("a.staff_id = ?", staff_id);
    }
    if let Some(date) = query.date {
        filters.push("a.date = ?", date);
    }
    if let Some(start_date) = query.start_date {
        filters.push("a.date >= ?", start_date);
    }
    if let Some(end_date) = query.end_date {
        filters.push("a.date <= ?", end_date);
    }

    let sql = format!(
        r#"
        SELECT a.*, s.staff_name, s.role, st.site_name
        FROM attendance a
        INNER JOIN staff s ON a.staff_id = s.id
        INNER JOIN sites st ON a.site_id = st.id
        {}
        ORDER BY a.date DESC, a.created_at DESC
        "#,
        filters.where_clause()
    );

    let attendance = bind_values_as(
        sqlx::query_as::<_, AttendanceRow>(&sql),
        filters.into_values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve attendance"))?;

    Ok(response::ok(attendance, "Attendance retrieved successfully"))
}

/// Get a single attendance record
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance retrieved successfully", body = AttendanceRow),
        (status = 404, description = "Attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn get_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let attendance = sqlx::query_as::<_, AttendanceRow>(SELECT_ATTENDANCE)
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to retrieve attendance"))?;

    match attendance {
        Some(row) => Ok(response::ok(row, "Attendance retrieved successfully")),
        None => Err(AppError::NotFound("Attendance not found".to_string())),
    }
}

/// Mark attendance for one staff member
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendancePayload,
    responses(
        (status = 201, description = "Attendance created successfully", body = AttendanceRow),
        (status = 400, description = "Missing fields, or already marked for this staff on this date")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn create_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<AttendancePayload>,
) -> Result<HttpResponse, AppError> {
    let (staff_id, site_id, date, status) = match (
        payload.staff_id,
        payload.site_id,
        payload.date,
        payload.status,
    ) {
        (Some(staff_id), Some(site_id), Some(date), Some(status)) => {
            (staff_id, site_id, date, status)
        }
        _ => {
            return Err(AppError::Validation(
                "Staff, site, date, and status are required".to_string(),
            ));
        }
    };

    let result = sqlx::query(
        "INSERT INTO attendance (staff_id, site_id, date, status, notes, photo) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(staff_id)
    .bind(site_id)
    .bind(date)
    .bind(status.to_string())
    .bind(&payload.notes)
    .bind(&payload.photo)
    .execute(pool.get_ref())
    .await;

    let id = match result {
        Ok(r) => r.last_insert_id(),
        Err(e) if db::is_duplicate_key(&e) => {
            return Err(AppError::Conflict(
                "Attendance already marked for this staff on this date".to_string(),
            ));
        }
        Err(e) => return Err(db_error("Failed to create attendance")(e)),
    };

    let attendance = sqlx::query_as::<_, AttendanceRow>(SELECT_ATTENDANCE)
        .bind(id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(db_error("Failed to create attendance"))?;

    Ok(response::created(
        attendance,
        "Attendance created successfully",
    ))
}

/// Mark attendance for many staff in one transaction.
///
/// Each entry upserts on the (staff_id, site_id, date) key; one failure rolls
/// the whole batch back.
#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = BulkAttendancePayload,
    responses(
        (status = 201, description = "Bulk attendance created successfully", body = [AttendanceRow]),
        (status = 400, description = "Site ID, date, and attendances array are required")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn bulk_create_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<BulkAttendancePayload>,
) -> Result<HttpResponse, AppError> {
    let (site_id, date, attendances) = match (
        payload.site_id,
        payload.date,
        payload.attendances.as_deref(),
    ) {
        (Some(site_id), Some(date), Some(entries)) if !entries.is_empty() => {
            (site_id, date, entries)
        }
        _ => {
            return Err(AppError::Validation(
                "Site ID, date, and attendances array are required".to_string(),
            ));
        }
    };

    let mut tx = pool
        .begin()
        .await
        .map_err(db_error("Failed to create bulk attendance"))?;

    for entry in attendances {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (staff_id, site_id, date, status, notes)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE status = ?, notes = ?
            "#,
        )
        .bind(entry.staff_id)
        .bind(site_id)
        .bind(date)
        .bind(entry.status.to_string())
        .bind(&entry.notes)
        .bind(entry.status.to_string())
        .bind(&entry.notes)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            tx.rollback()
                .await
                .map_err(db_error("Failed to create bulk attendance"))?;
            return Err(db_error("Failed to create bulk attendance")(e));
        }
    }

    tx.commit()
        .await
        .map_err(db_error("Failed to create bulk attendance"))?;

    let attendance = sqlx::query_as::<_, AttendanceRow>(
        r#"
        SELECT a.*, s.staff_name, s.role, st.site_name
        FROM attendance a
        INNER JOIN staff s ON a.staff_id = s.id
        INNER JOIN sites st ON a.site_id = st.id
        WHERE a.site_id = ? AND a.date = ?
        "#,
    )
    .bind(site_id)
    .bind(date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to create bulk attendance"))?;

    Ok(response::created(
        attendance,
        "Bulk attendance created successfully",
    ))
}

/// Update an attendance record (full replace; photo kept unless re-supplied)
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    request_body = AttendancePayload,
    responses(
        (status = 200, description = "Attendance updated successfully", body = AttendanceRow),
        (status = 404, description = "Attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AttendancePayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut sql = String::from(
        "UPDATE attendance SET staff_id = ?, site_id = ?, date = ?, status = ?, notes = ?",
    );
    let mut values: Vec<SqlValue> = vec![
        payload.staff_id.into(),
        payload.site_id.into(),
        payload.date.into(),
        payload.status.map(|s| s.to_string()).into(),
        payload.notes.clone().into(),
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
        .map_err(db_error("Failed to update attendance"))?;

    let attendance = sqlx::query_as::<_, AttendanceRow>(SELECT_ATTENDANCE)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(db_error("Failed to update attendance"))?;

    match attendance {
        Some(row) => Ok(response::ok(row, "Attendance updated successfully")),
        None => Err(AppError::NotFound("Attendance not found".to_string())),
    }
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance deleted successfully"),
        (status = 404, description = "Attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(db_error("Failed to delete attendance"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Attendance not found".to_string()));
    }

    Ok(response::ok(
        serde_json::Value::Null,
        "Attendance deleted successfully",
    ))
}

/// Per-status counts for a site over a date range
#[utoipa::path(
    get,
    path = "/api/attendance/summary/report",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Attendance summary retrieved successfully", body = [StatusCount]),
        (status = 400, description = "Site ID, start date, and end date are required")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    pool: web::Data<MySqlPool>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let (site_id, start_date, end_date) =
        match (query.site_id, query.start_date, query.end_date) {
            (Some(site_id), Some(start_date), Some(end_date)) => (site_id, start_date, end_date),
            _ => {
                return Err(AppError::Validation(
                    "Site ID, start date, and end date are required".to_string(),
                ));
            }
        };

    let summary = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) as count
        FROM attendance
        WHERE site_id = ? AND date BETWEEN ? AND ?
        GROUP BY status
        "#,
    )
    .bind(site_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(db_error("Failed to retrieve attendance summary"))?;

    Ok(response::ok(
        summary,
        "Attendance summary retrieved successfully",
    ))
}
