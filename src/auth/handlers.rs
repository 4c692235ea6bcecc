use crate::{
    auth::{
        auth::AuthUser,
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    db,
    error::{AppError, db_error},
    models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo, UserSql},
    response,
};
use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use tracing::{info, instrument};

/// Login: exchanges username + password for a signed token.
///
/// An unknown username and a wrong password produce the identical 401 so
/// callers cannot enumerate accounts.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, payload), fields(username = %payload.username))]
pub async fn login(
    payload: web::Json<LoginRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Please provide username and password".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, username, password, full_name, phone, is_active, created_at
        FROM users
        WHERE username = ? AND is_active = TRUE
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(db_error("Login failed"))?;

    let Some(user) = user else {
        info!("Invalid credentials: user not found");
        return Err(AppError::Auth("Invalid credentials".to_string()));
    };

    if !verify_password(&payload.password, &user.password) {
        info!("Invalid credentials: password mismatch");
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let token = generate_token(
        user.id,
        user.username.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!(user_id = user.id, "Login successful");

    Ok(response::ok(
        LoginResponse {
            token,
            user: user.into(),
        },
        "Login successful",
    ))
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserInfo),
        (status = 400, description = "Missing fields or username already exists")
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: web::Json<RegisterRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let hashed = hash_password(&payload.password);

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password, full_name, phone)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.username.trim())
    .bind(&hashed)
    .bind(&payload.full_name)
    .bind(&payload.phone)
    .execute(pool.get_ref())
    .await;

    let user_id = match result {
        Ok(r) => r.last_insert_id(),
        Err(e) if db::is_duplicate_key(&e) => {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        Err(e) => return Err(db_error("Failed to create user")(e)),
    };

    let user = sqlx::query_as::<_, UserInfo>(
        r#"
        SELECT id, username, full_name, phone, is_active, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(db_error("Failed to create user"))?;

    Ok(response::created(user, "User created successfully"))
}

/// Current user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserInfo),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, AppError> {
    let user = sqlx::query_as::<_, UserInfo>(
        r#"
        SELECT id, username, full_name, phone, is_active, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(db_error("Failed to get profile"))?;

    match user {
        Some(user) => Ok(response::ok(user, "Profile retrieved successfully")),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}
