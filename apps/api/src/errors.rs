use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Errors the HTTP surface reports to callers.
///
/// Pipeline failures never reach this type: they are degraded to the
/// "No result available" payload before a response is built.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("query cannot be empty")]
    EmptyQuery,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("no result stored for request {0}")]
    ResultNotFound(Uuid),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::EmptyQuery => (StatusCode::BAD_REQUEST, "EMPTY_QUERY"),
            AppError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "MALFORMED_BODY"),
            AppError::ResultNotFound(_) => (StatusCode::NOT_FOUND, "RESULT_NOT_FOUND"),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_maps_to_bad_request() {
        let response = AppError::EmptyQuery.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_result_maps_to_404() {
        let id = Uuid::new_v4();
        let err = AppError::ResultNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
