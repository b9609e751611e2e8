//! HTTP API module
//!
//! Input events (toggle, switch), settings commits and display reads.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/toggle", post(toggle_handler))
        .route("/switch", post(switch_handler))
        .route("/reset", post(reset_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::engine::{ClockSettings, Side, SideSettings};

    fn router() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(
            20554,
            "127.0.0.1".to_string(),
            ClockSettings::symmetric(SideSettings::from_minutes(5, 0)),
            Side::Left,
            Duration::from_millis(100),
        ));
        (Arc::clone(&state), create_router(state))
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn settings_body(minutes: &str, seconds: &str) -> Value {
        let side = json!({ "minutes": minutes, "seconds": seconds, "tenths": "0", "increment_seconds": "0" });
        json!({ "left": side, "right": side })
    }

    #[tokio::test]
    async fn status_reports_initial_clock() {
        let (_, router) = router();
        let (status, body) = call(&router, Method::GET, "/status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "stopped");
        assert_eq!(body["clock"]["left"]["display"], "05:00:0");
        assert_eq!(body["clock"]["active_side"], "left");
        assert_eq!(body["port"], 20554);
    }

    #[tokio::test]
    async fn toggle_then_switch() {
        let (state, router) = router();

        let (status, body) = call(&router, Method::POST, "/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["clock"]["left"]["highlighted"], true);

        let (status, body) = call(&router, Method::POST, "/switch", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clock"]["active_side"], "right");
        assert!(state.is_running().unwrap());
    }

    #[tokio::test]
    async fn switch_while_stopped_conflicts() {
        let (state, router) = router();
        let (status, body) = call(&router, Method::POST, "/switch", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
        assert_eq!(state.snapshot().unwrap().active_side, Side::Left);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let (_, router) = router();

        let (status, body) = call(&router, Method::PUT, "/settings", Some(settings_body("1", "15"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clock"]["right"]["display"], "01:15:0");

        let (status, body) = call(&router, Method::GET, "/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["left"]["minutes"], "1");
        assert_eq!(body["left"]["seconds"], "15");
    }

    #[tokio::test]
    async fn invalid_settings_rejected_with_field() {
        let (state, router) = router();
        let before = state.snapshot().unwrap();

        let (status, body) = call(&router, Method::PUT, "/settings", Some(settings_body("5", "7x"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["side"], "left");
        assert_eq!(body["field"], "seconds");
        assert_eq!(state.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn toggle_refused_after_flag() {
        let (_, router) = router();
        let (status, _) = call(&router, Method::PUT, "/settings", Some(settings_body("0", "0"))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&router, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "flagged");

        let (status, _) = call(&router, Method::POST, "/toggle", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(&router, Method::POST, "/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "flagged");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_, router) = router();
        let (status, body) = call(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
