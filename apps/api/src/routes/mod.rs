pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::query::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/query", post(handlers::handle_submit_query))
        .route("/api/result", get(handlers::handle_latest_result))
        .route(
            "/api/result/:request_id",
            get(handlers::handle_get_result),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::result::NO_RESULT_SENTINEL;
    use crate::query::pipeline::QueryPipeline;
    use crate::query::tabular::TabularResult;
    use crate::query::test_support::{ScriptedGenerator, StubExecutor, StubOutcome};
    use crate::query::GenerationSettings;
    use crate::results::ResultStore;

    const SQL: &str = "SELECT event_name FROM event_info WHERE LOWER(event_info.similar_terms) LIKE '%finance%'";

    fn app(responses: Vec<&str>, outcome: StubOutcome) -> Router {
        let generator = ScriptedGenerator::new(responses.into_iter().map(|r| Ok(r.to_string())).collect());
        let pipeline = QueryPipeline::new(
            Arc::new(generator),
            Arc::new(StubExecutor::new(outcome)),
            GenerationSettings::default(),
            Duration::from_secs(30),
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
            results: ResultStore::new(16),
        })
    }

    fn finance_rows() -> TabularResult {
        TabularResult::new(
            vec!["event_name".to_string()],
            vec![vec![json!("FinTech Week")]],
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_query(body: Value) -> Request<Body> {
        Request::post("/api/query")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["stored_results"], 0);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let (status, body) = send(&app, post_query(json!({"query": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_QUERY");

        let (status, _) = send(&app, post_query(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_as_json() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let request = Request::post("/api/query")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MALFORMED_BODY");
    }

    #[tokio::test]
    async fn test_submit_then_fetch_by_id() {
        let app = app(
            vec![SQL, "There is one finance event: FinTech Week."],
            StubOutcome::Rows(finance_rows()),
        );

        let (status, body) = send(&app, post_query(json!({"query": "find all finance events"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Query processed");
        assert_eq!(body["context"], "event");
        assert_eq!(body["response"], "There is one finance event: FinTech Week.");

        let request_id = body["request_id"].as_str().unwrap().to_string();
        let (status, fetched) = send(&app, get(&format!("/api/result/{request_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["response"], "There is one finance event: FinTech Week.");
        assert_eq!(fetched["sql"], SQL);

        let (_, latest) = send(&app, get("/api/result")).await;
        assert_eq!(latest["request_id"], request_id.as_str());
    }

    #[tokio::test]
    async fn test_raw_mode_returns_records() {
        let app = app(vec![SQL], StubOutcome::Rows(finance_rows()));
        let (_, body) = send(
            &app,
            post_query(json!({"query": "find all finance events", "raw": true})),
        )
        .await;
        assert_eq!(body["response"], json!([{"event_name": "FinTech Week"}]));
    }

    #[tokio::test]
    async fn test_pipeline_failure_returns_sentinel_without_internals() {
        let app = app(
            vec![SQL],
            StubOutcome::Fail("no such column: employee_count".to_string()),
        );
        let (status, body) = send(&app, post_query(json!({"query": "finance events"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], NO_RESULT_SENTINEL);
        assert!(!body.to_string().contains("employee_count"));
    }

    #[tokio::test]
    async fn test_latest_without_submissions_is_sentinel() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let (status, body) = send(&app, get("/api/result")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": NO_RESULT_SENTINEL}));
    }

    #[tokio::test]
    async fn test_unknown_result_id_is_404() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let uri = format!("/api/result/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "RESULT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_quit_is_acknowledged_with_empty_response() {
        let app = app(vec![], StubOutcome::Rows(TabularResult::default()));
        let (status, body) = send(&app, post_query(json!({"query": "quit"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "");
        assert!(body["context"].is_null());
    }
}
