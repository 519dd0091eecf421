//! HTTP API router.
//!
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! CORS → Extension → Rate limiter → Identity (dashboard only) → Access log

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::MAX_REQUEST_BYTES;
use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

const ALLOWED_HEADERS: [&str; 6] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-user-id",
    "x-user-role",
];

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn build_router(ctx: ApiContext) -> Router {
    // Image routes and public reads — rate-limited only
    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/detect", post(endpoints::detect::detect))
        .route(
            "/analyze-wheat-disease",
            post(endpoints::analyze::analyze).layer(from_fn(endpoints::analyze::limit_body)),
        )
        .route("/research-updates", get(endpoints::research_updates::list_verified))
        .with_state(ctx.clone())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES as usize))
        .layer(from_fn(middleware::access_log::log_access))
        .layer(from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx.clone()));

    // Dashboard routes — require caller identity
    let dashboard = Router::new()
        .route(
            "/reports",
            post(endpoints::reports::create).get(endpoints::reports::list_all),
        )
        .route("/reports/mine", get(endpoints::reports::mine))
        .route("/reports/:id/status", put(endpoints::reports::update_status))
        .route("/research-updates", post(endpoints::research_updates::publish))
        .route("/research-updates/mine", get(endpoints::research_updates::mine))
        .route(
            "/research-updates/:id/verification",
            put(endpoints::research_updates::set_verification),
        )
        .with_state(ctx.clone())
        .layer(from_fn(middleware::access_log::log_access))
        .layer(from_fn(middleware::identity::require_identity))
        .layer(from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", public)
        .nest("/api", dashboard)
        .layer(cors_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use base64::Engine;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use tower::ServiceExt;

    use crate::analysis::{MockVisionGateway, VisionGateway};
    use crate::api::types::RateLimiter;
    use crate::pipeline::detection::DetectionService;
    use crate::pipeline::picker::DiseaseCatalog;

    const HEALTHY_REPLY: &str = r#"```json
{"isWheatLeaf": true, "disease": {"name": "Healthy", "severity": null, "confidence": 92,
 "treatment": null, "prevention": null}, "message": "No visible disease"}
```"#;

    fn test_ctx(gateway: Option<Arc<dyn VisionGateway>>) -> ApiContext {
        let conn = crate::db::open_memory_database().unwrap();
        ApiContext::new(
            DetectionService::with_catalog(Arc::new(DiseaseCatalog::wheat())),
            gateway,
            conn,
        )
    }

    fn app() -> Router {
        build_router(test_ctx(None))
    }

    fn png_data_url(color: [u8; 4]) -> String {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(96, 96, Rgba(color)))
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn as_user(mut req: Request<Body>, id: &str, role: &str) -> Request<Body> {
        req.headers_mut().insert("x-user-id", id.parse().unwrap());
        req.headers_mut().insert("x-user-role", role.parse().unwrap());
        req
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // ── Health ──────────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_ai_configuration() {
        let response = app().oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ai_configured"], false);

        let gateway: Arc<dyn VisionGateway> = Arc::new(MockVisionGateway::new(HEALTHY_REPLY));
        let response = build_router(test_ctx(Some(gateway)))
            .oneshot(get_request("/api/health"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["ai_configured"], true);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app().oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ── CORS ────────────────────────────────────────────────

    #[tokio::test]
    async fn cors_preflight_answered() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/analyze-wheat-disease")
            .header("Origin", "https://farm.example")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type, apikey")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        let allowed = response
            .headers()
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allowed.contains("x-client-info"));
    }

    // ── Detect ──────────────────────────────────────────────

    #[tokio::test]
    async fn detect_green_leaf_returns_disease() {
        let body = serde_json::json!({ "imageBase64": png_data_url([40, 180, 40, 255]) });
        let response = app()
            .oneshot(json_request("POST", "/api/detect", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "detected");
        let name = json["result"]["diseaseName"].as_str().unwrap();
        assert!(DiseaseCatalog::wheat().contains_name(name));
        assert_eq!(json["result"]["deterministic"], true);
    }

    #[tokio::test]
    async fn detect_is_deterministic_per_image() {
        let body = serde_json::json!({ "imageBase64": png_data_url([40, 180, 40, 255]) });
        let first = body_json(
            app().oneshot(json_request("POST", "/api/detect", body.clone())).await.unwrap(),
        )
        .await;
        let second = body_json(
            app().oneshot(json_request("POST", "/api/detect", body)).await.unwrap(),
        )
        .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn detect_sky_photo_rejected() {
        let body = serde_json::json!({ "imageBase64": png_data_url([100, 180, 240, 255]) });
        let response = app()
            .oneshot(json_request("POST", "/api/detect", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "rejected");
        assert!(json["reason"].as_str().unwrap().contains("wheat leaf"));
    }

    #[tokio::test]
    async fn detect_without_image_is_400() {
        let response = app()
            .oneshot(json_request("POST", "/api/detect", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "No image provided");
    }

    // ── Vision proxy ────────────────────────────────────────

    #[tokio::test]
    async fn analyze_without_key_is_not_configured() {
        let body = serde_json::json!({ "imageBase64": "data:image/png;base64,AAAA" });
        let response = app()
            .oneshot(json_request("POST", "/api/analyze-wheat-disease", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["message"], "AI service not configured");
    }

    #[tokio::test]
    async fn analyze_relays_parsed_verdict() {
        let gateway: Arc<dyn VisionGateway> = Arc::new(MockVisionGateway::new(HEALTHY_REPLY));
        let body = serde_json::json!({ "imageBase64": "data:image/jpeg;base64,AAAA" });
        let response = build_router(test_ctx(Some(gateway)))
            .oneshot(json_request("POST", "/api/analyze-wheat-disease", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["isWheatLeaf"], true);
        assert_eq!(json["disease"]["name"], "Healthy");
    }

    #[tokio::test]
    async fn analyze_rejects_unsupported_format() {
        let gateway: Arc<dyn VisionGateway> = Arc::new(MockVisionGateway::new(HEALTHY_REPLY));
        let body = serde_json::json!({ "imageBase64": "data:image/bmp;base64,AAAA" });
        let response = build_router(test_ctx(Some(gateway)))
            .oneshot(json_request("POST", "/api/analyze-wheat-disease", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Invalid image format. Supported formats: JPEG, PNG, WEBP, GIF"
        );
    }

    #[tokio::test]
    async fn analyze_declared_oversize_is_413() {
        let mut request = json_request(
            "POST",
            "/api/analyze-wheat-disease",
            serde_json::json!({ "imageBase64": "data:image/png;base64,AAAA" }),
        );
        request.headers_mut().insert(
            axum::http::header::CONTENT_LENGTH,
            (MAX_REQUEST_BYTES + 1).to_string().parse().unwrap(),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn analyze_maps_gateway_rate_limit() {
        let gateway: Arc<dyn VisionGateway> = Arc::new(MockVisionGateway::failing(429));
        let body = serde_json::json!({ "imageBase64": "data:image/png;base64,AAAA" });
        let response = build_router(test_ctx(Some(gateway)))
            .oneshot(json_request("POST", "/api/analyze-wheat-disease", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn analyze_unparseable_reply_is_500() {
        let gateway: Arc<dyn VisionGateway> =
            Arc::new(MockVisionGateway::new("I cannot help with that."));
        let body = serde_json::json!({ "imageBase64": "data:image/png;base64,AAAA" });
        let response = build_router(test_ctx(Some(gateway)))
            .oneshot(json_request("POST", "/api/analyze-wheat-disease", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Failed to parse analysis result"
        );
    }

    // ── Dashboards ──────────────────────────────────────────

    fn new_report() -> serde_json::Value {
        serde_json::json!({
            "symptoms": "Orange pustules on lower leaves",
            "location": "North field",
            "ai_prediction": "Leaf Rust",
            "ai_confidence": 82.5,
            "severity": "Medium"
        })
    }

    #[tokio::test]
    async fn dashboard_requires_identity() {
        let response = app().oneshot(get_request("/api/reports/mine")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn researcher_cannot_file_report() {
        let request = as_user(json_request("POST", "/api/reports", new_report()), "r1", "researcher");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn farmer_cannot_list_all_reports() {
        let request = as_user(get_request("/api/reports"), "f1", "farmer");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn report_lifecycle() {
        let app = app();

        let request = as_user(json_request("POST", "/api/reports", new_report()), "f1", "farmer");
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["farmer_id"], "f1");
        let id = created["id"].as_str().unwrap().to_string();

        // Another farmer sees nothing
        let request = as_user(get_request("/api/reports/mine"), "f2", "farmer");
        let json = body_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(json.as_array().unwrap().len(), 0);

        // Researcher moves it along
        let request = as_user(
            json_request(
                "PUT",
                &format!("/api/reports/{id}/status"),
                serde_json::json!({ "status": "under_review" }),
            ),
            "r1",
            "researcher",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "under_review");

        // Owner sees the new status
        let request = as_user(get_request("/api/reports/mine"), "f1", "farmer");
        let json = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(json[0]["status"], "under_review");
    }

    #[tokio::test]
    async fn status_update_unknown_report_is_404() {
        let request = as_user(
            json_request(
                "PUT",
                &format!("/api/reports/{}/status", uuid::Uuid::new_v4()),
                serde_json::json!({ "status": "resolved" }),
            ),
            "r1",
            "researcher",
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn report_requires_symptoms() {
        let body = serde_json::json!({ "symptoms": "  ", "location": "Field" });
        let request = as_user(json_request("POST", "/api/reports", body), "f1", "farmer");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn published_updates_listed_for_everyone() {
        let app = app();
        for title in ["Rust alert", "Mildew watch"] {
            let request = as_user(
                json_request(
                    "POST",
                    "/api/research-updates",
                    serde_json::json!({ "title": title, "disease_name": "Leaf Rust" }),
                ),
                "r1",
                "researcher",
            );
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }
        let unverified = as_user(
            json_request(
                "POST",
                "/api/research-updates",
                serde_json::json!({ "title": "Draft", "is_verified": false }),
            ),
            "r1",
            "researcher",
        );
        app.clone().oneshot(unverified).await.unwrap();

        let response = app
            .clone()
            .oneshot(get_request("/api/research-updates"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 2);

        let response = app
            .oneshot(get_request("/api/research-updates?limit=1"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn farmer_cannot_publish_update() {
        let request = as_user(
            json_request("POST", "/api/research-updates", serde_json::json!({ "title": "x" })),
            "f1",
            "farmer",
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    fn publish_request(body: serde_json::Value, researcher: &str) -> Request<Body> {
        as_user(json_request("POST", "/api/research-updates", body), researcher, "researcher")
    }

    #[tokio::test]
    async fn answering_report_marks_it_verified() {
        let app = app();

        let request = as_user(json_request("POST", "/api/reports", new_report()), "f1", "farmer");
        let created = body_json(app.clone().oneshot(request).await.unwrap()).await;
        let report_id = created["id"].as_str().unwrap().to_string();

        let request = publish_request(
            serde_json::json!({
                "title": "Leaf rust confirmed in North field",
                "disease_name": "Leaf Rust",
                "treatment": "Apply triazole fungicide",
                "disease_report_id": report_id,
            }),
            "r1",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["disease_report_id"], report_id.as_str());

        let request = as_user(get_request("/api/reports/mine"), "f1", "farmer");
        let json = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(json[0]["status"], "verified");
    }

    #[tokio::test]
    async fn answering_unknown_report_is_404() {
        let app = app();
        let request = publish_request(
            serde_json::json!({
                "title": "Orphan answer",
                "disease_report_id": uuid::Uuid::new_v4(),
            }),
            "r1",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Nothing was published
        let response = app.oneshot(get_request("/api/research-updates")).await.unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn researcher_lists_own_updates() {
        let app = app();
        for (title, researcher, verified) in
            [("Rust alert", "r1", true), ("Draft", "r1", false), ("Smut note", "r2", true)]
        {
            let request = publish_request(
                serde_json::json!({ "title": title, "is_verified": verified }),
                researcher,
            );
            assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::CREATED);
        }

        let request = as_user(get_request("/api/research-updates/mine"), "r1", "researcher");
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let titles: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Draft"));
        assert!(!titles.contains(&"Smut note"));

        let request = as_user(get_request("/api/research-updates/mine"), "f1", "farmer");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn withdrawn_update_leaves_public_list() {
        let app = app();
        let request = publish_request(serde_json::json!({ "title": "Rust alert" }), "r1");
        let created = body_json(app.clone().oneshot(request).await.unwrap()).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/api/research-updates/{id}/verification");

        let request = as_user(
            json_request("PUT", &uri, serde_json::json!({ "is_verified": false })),
            "f1",
            "farmer",
        );
        assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::FORBIDDEN);

        let request = as_user(
            json_request("PUT", &uri, serde_json::json!({ "is_verified": false })),
            "r1",
            "researcher",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(get_request("/api/research-updates")).await.unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

        let request = as_user(
            json_request("PUT", &uri, serde_json::json!({ "is_verified": true })),
            "r1",
            "researcher",
        );
        app.clone().oneshot(request).await.unwrap();
        let response = app.oneshot(get_request("/api/research-updates")).await.unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn verification_of_unknown_update_is_404() {
        let request = as_user(
            json_request(
                "PUT",
                &format!("/api/research-updates/{}/verification", uuid::Uuid::new_v4()),
                serde_json::json!({ "is_verified": true }),
            ),
            "r1",
            "researcher",
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ── Body rejections ─────────────────────────────────────

    fn undeclared_oversize_request(uri: &str) -> Request<Body> {
        // Body::from(Vec) sets no Content-Length header on the request
        let body = vec![b'a'; MAX_REQUEST_BYTES as usize + 1];
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn undeclared_oversize_body_is_json_413() {
        for uri in ["/api/detect", "/api/analyze-wheat-disease"] {
            let request = undeclared_oversize_request(uri);
            assert!(request.headers().get(axum::http::header::CONTENT_LENGTH).is_none());
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
            assert_eq!(json["error"]["message"], "Request too large. Maximum size is 10MB");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_json_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/detect")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    // ── Rate limiting ───────────────────────────────────────

    fn from_peer(mut req: Request<Body>, peer: &str) -> Request<Body> {
        let addr: std::net::SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(axum::extract::ConnectInfo(addr));
        req
    }

    #[tokio::test]
    async fn rate_limit_applies_per_client_address() {
        let ctx = test_ctx(None).with_rate_limiter(RateLimiter::with_limits(2, 100));
        let app = build_router(ctx);

        for _ in 0..2 {
            let request = from_peer(get_request("/api/health"), "203.0.113.9:4000");
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let request = from_peer(get_request("/api/health"), "203.0.113.9:4001");
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let request = from_peer(get_request("/api/health"), "198.51.100.4:4000");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rotating_declared_identity_does_not_reset_limit() {
        let ctx = test_ctx(None).with_rate_limiter(RateLimiter::with_limits(1, 100));
        let app = build_router(ctx);

        let mut statuses = Vec::new();
        for i in 0..50 {
            let mut request = from_peer(get_request("/api/health"), "203.0.113.9:4000");
            request
                .headers_mut()
                .insert("x-user-id", format!("user-{i}").parse().unwrap());
            request
                .headers_mut()
                .insert("x-forwarded-for", format!("10.0.0.{i}").parse().unwrap());
            statuses.push(app.clone().oneshot(request).await.unwrap().status());
        }
        assert_eq!(statuses[0], StatusCode::OK);
        assert!(statuses[1..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
    }
}
