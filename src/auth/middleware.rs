use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::response;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web::Data,
};

/// Rejects unauthenticated calls uniformly with a 401 envelope; on success
/// the decoded identity is attached to the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization").map(|h| h.to_str()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            let resp = response::fail(
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header encoding",
            );
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
        None => {
            let resp = response::fail(StatusCode::UNAUTHORIZED, "Missing Authorization header");
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = response::fail(
                StatusCode::UNAUTHORIZED,
                "Authorization header must start with Bearer",
            );
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => {
            let resp = response::fail(StatusCode::UNAUTHORIZED, "Invalid or expired token");
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let auth_user = AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
