use crate::engine::ScanEngine;
use crate::http::handlers::{
    all_scan_handler, day_scan_handler, favicon_handler, greeting_handler, health_handler,
};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub struct AppServer {
    pub router: Router,
    pub engine: Arc<ScanEngine>,
}

pub const PATH_ROOT: &str = "/";
pub const PATH_FAVICON: &str = "/favicon.ico";
pub const PATH_DAY_SCAN: &str = "/dayscan/:calendar_date";
pub const PATH_ALL_SCAN: &str = "/allscan";
pub const PATH_HEALTH: &str = "/health";

impl AppServer {
    pub fn new(engine: ScanEngine) -> Self {
        let engine = Arc::new(engine);
        AppServer {
            router: Router::new()
                .route(PATH_ROOT, get(greeting_handler))
                .route(PATH_FAVICON, get(favicon_handler))
                .route(PATH_DAY_SCAN, get(day_scan_handler))
                .route(PATH_ALL_SCAN, get(all_scan_handler))
                .route(PATH_HEALTH, get(health_handler))
                .layer(from_fn(cors_middleware))
                .with_state(engine.clone()),
            engine,
        }
    }
}

/// Browser clients load the data from other origins, so every response
/// carries permissive CORS headers and preflights are answered here
/// without touching a handler.
async fn cors_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(resp.headers_mut());
        return resp;
    }

    let mut resp = next.run(req).await;
    apply_cors_headers(resp.headers_mut());
    resp
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
}
