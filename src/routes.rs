use crate::{
    api::{attendance, dashboard, dpr, inventory, site, staff, work_type},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    response,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpRequest, HttpResponse, error, http::StatusCode, middleware::from_fn, web,
};

/// Public health check
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Construction Management API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> HttpResponse {
    response::fail(StatusCode::NOT_FOUND, "Route not found")
}

/// Malformed JSON bodies still get the standard failure envelope.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let resp = response::fail(StatusCode::BAD_REQUEST, &err.to_string());
    error::InternalError::from_response(err, resp).into()
}

/// Same for unparseable query strings.
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let resp = response::fail(StatusCode::BAD_REQUEST, &err.to_string());
    error::InternalError::from_response(err, resp).into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.route("/", web::get().to(index));

    // Public routes (login/register issue credentials; profile is guarded per-route)
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix))
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(build_limiter(config.rate_register_per_min))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/profile")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(handlers::profile)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(build_limiter(config.rate_protected_per_min))
            .service(
                web::scope("/sites")
                    .service(
                        web::resource("")
                            .route(web::get().to(site::list_sites))
                            .route(web::post().to(site::create_site)),
                    )
                    .service(web::resource("/{id}/stats").route(web::get().to(site::site_stats)))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(site::get_site))
                            .route(web::put().to(site::update_site))
                            .route(web::delete().to(site::delete_site)),
                    ),
            )
            .service(
                web::scope("/staff")
                    .service(
                        web::resource("")
                            .route(web::get().to(staff::list_staff))
                            .route(web::post().to(staff::create_staff)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(staff::get_staff))
                            .route(web::put().to(staff::update_staff))
                            .route(web::delete().to(staff::delete_staff)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/summary/report")
                            .route(web::get().to(attendance::attendance_summary)),
                    )
                    .service(
                        web::resource("/bulk")
                            .route(web::post().to(attendance::bulk_create_attendance)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::scope("/dpr")
                    .service(
                        web::resource("/summary/report").route(web::get().to(dpr::dpr_summary)),
                    )
                    .service(
                        web::resource("/cumulative/progress")
                            .route(web::get().to(dpr::cumulative_progress)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(dpr::list_dpr))
                            .route(web::post().to(dpr::create_dpr)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(dpr::get_dpr))
                            .route(web::put().to(dpr::update_dpr))
                            .route(web::delete().to(dpr::delete_dpr)),
                    ),
            )
            .service(
                web::scope("/inventory")
                    .service(
                        web::resource("/summary/{site_id}")
                            .route(web::get().to(inventory::inventory_summary)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(inventory::list_inventory))
                            .route(web::post().to(inventory::create_inventory)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(inventory::get_inventory))
                            .route(web::put().to(inventory::update_inventory))
                            .route(web::delete().to(inventory::delete_inventory)),
                    ),
            )
            .service(
                web::scope("/work-types")
                    .service(
                        web::resource("")
                            .route(web::get().to(work_type::list_work_types))
                            .route(web::post().to(work_type::create_work_type)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(work_type::get_work_type))
                            .route(web::put().to(work_type::update_work_type))
                            .route(web::delete().to(work_type::delete_work_type)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(
                        web::resource("/site/{site_id}")
                            .route(web::get().to(dashboard::get_site_dashboard)),
                    )
                    .service(web::resource("").route(web::get().to(dashboard::get_dashboard))),
            ),
    );

    cfg.default_service(web::route().to(not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_token;
    use actix_web::{App, test, web::Data};
    use serde_json::{Value, json};
    use sqlx::MySqlPool;
    use sqlx::mysql::MySqlPoolOptions;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    const SECRET: &str = "route-test-secret";

    fn test_config() -> Config {
        Config {
            database_url: "mysql://root@127.0.0.1:3306/csm_test".to_string(),
            jwt_secret: SECRET.to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            access_token_ttl: 3600,
            db_max_connections: 1,
            rate_login_per_min: 60,
            rate_register_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
        }
    }

    // Never connected; handlers under test reject before touching the pool.
    fn lazy_pool() -> MySqlPool {
        MySqlPoolOptions::new()
            .max_connections(1)
            .connect_lazy("mysql://root@127.0.0.1:3306/csm_test")
            .unwrap()
    }

    fn peer() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000)
    }

    fn bearer() -> (&'static str, String) {
        (
            "Authorization",
            format!("Bearer {}", generate_token(1, "tester".to_string(), SECRET, 3600)),
        )
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(Data::new(lazy_pool()))
                    .app_data(Data::new(test_config()))
                    .configure(|cfg| configure(cfg, test_config())),
            )
            .await
        };
    }

    async fn read_json(resp: actix_web::dev::ServiceResponse) -> Value {
        let bytes = test::read_body(resp).await;
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn health_check_is_public() {
        let app = test_app!();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], json!(true));
    }

    #[actix_web::test]
    async fn unknown_route_gets_404_envelope() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/definitely-not-a-route").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = read_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Route not found"));
    }

    #[actix_web::test]
    async fn protected_routes_require_a_token() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/sites")
                .peer_addr(peer())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Missing Authorization header"));
    }

    #[actix_web::test]
    async fn non_bearer_header_is_rejected() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/sites")
                .peer_addr(peer())
                .insert_header(("Authorization", "Token abc"))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Authorization header must start with Bearer")
        );
    }

    #[actix_web::test]
    async fn tampered_token_is_rejected() {
        let app = test_app!();
        let token = generate_token(1, "tester".to_string(), "some-other-secret", 3600);
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/sites")
                .peer_addr(peer())
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(resp).await;
        assert_eq!(body["message"], json!("Invalid or expired token"));
    }

    #[actix_web::test]
    async fn login_requires_credentials() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .peer_addr(peer())
                .set_json(json!({"username": "", "password": ""}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["message"], json!("Please provide username and password"));
    }

    #[actix_web::test]
    async fn register_requires_credentials() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .peer_addr(peer())
                .set_json(json!({"username": "  ", "password": ""}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["message"], json!("Username and password are required"));
    }

    #[actix_web::test]
    async fn create_site_requires_name() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/sites")
                .peer_addr(peer())
                .insert_header(bearer())
                .set_json(json!({"notes": "no name supplied"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["message"], json!("Site name is required"));
    }

    #[actix_web::test]
    async fn create_attendance_requires_core_fields() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/attendance")
                .peer_addr(peer())
                .insert_header(bearer())
                .set_json(json!({"staff_id": 5, "site_id": 2}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Staff, site, date, and status are required")
        );
    }

    #[actix_web::test]
    async fn bulk_attendance_rejects_empty_batch() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/attendance/bulk")
                .peer_addr(peer())
                .insert_header(bearer())
                .set_json(json!({"site_id": 2, "date": "2024-01-01", "attendances": []}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Site ID, date, and attendances array are required")
        );
    }

    #[actix_web::test]
    async fn attendance_summary_requires_full_range() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/attendance/summary/report?site_id=1&start_date=2024-01-01")
                .peer_addr(peer())
                .insert_header(bearer())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Site ID, start date, and end date are required")
        );
    }

    #[actix_web::test]
    async fn dpr_summary_requires_site() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dpr/summary/report")
                .peer_addr(peer())
                .insert_header(bearer())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["message"], json!("Site ID is required"));
    }

    #[actix_web::test]
    async fn cumulative_progress_requires_both_ids() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dpr/cumulative/progress?site_id=1")
                .peer_addr(peer())
                .insert_header(bearer())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Site ID and work type ID are required")
        );
    }

    #[actix_web::test]
    async fn malformed_json_gets_400_envelope() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/sites")
                .peer_addr(peer())
                .insert_header(bearer())
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["success"], json!(false));
    }
}
