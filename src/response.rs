use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::json;

/// `{success: true, message, data}` at an explicit status.
pub fn with_status(status: StatusCode, data: impl Serialize, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

pub fn ok(data: impl Serialize, message: &str) -> HttpResponse {
    with_status(StatusCode::OK, data, message)
}

pub fn created(data: impl Serialize, message: &str) -> HttpResponse {
    with_status(StatusCode::CREATED, data, message)
}

/// `{success: false, message}` at a non-2xx status.
pub fn fail(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "message": message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    async fn body_json(resp: HttpResponse) -> Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn ok_wraps_data_in_envelope() {
        let resp = ok(json!({"id": 7}), "Retrieved");
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("Retrieved"));
        assert_eq!(body["data"]["id"], json!(7));
    }

    #[actix_web::test]
    async fn created_uses_201() {
        let resp = created(Value::Null, "Created");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn fail_has_no_data_field() {
        let resp = fail(StatusCode::NOT_FOUND, "Site not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Site not found"));
        assert!(body.get("data").is_none());
    }
}
