use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::integrations::fanout::FanoutReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Uniform response envelope returned by every endpoint. The HTTP status of
/// the response always equals `code`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub response_id: String,
    pub message: String,
    pub status: ResponseStatus,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Per-integration delivery report, present only when fan-out ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrations: Option<FanoutReport>,
}

impl ApiResponse {
    pub fn success(
        response_id: impl Into<String>,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        ApiResponse {
            response_id: response_id.into(),
            message: message.into(),
            status: ResponseStatus::Success,
            code: StatusCode::OK.as_u16(),
            data,
            integrations: None,
        }
    }

    pub fn failure(
        response_id: impl Into<String>,
        code: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        ApiResponse {
            response_id: response_id.into(),
            message: message.into(),
            status: ResponseStatus::Failure,
            code: code.as_u16(),
            data: None,
            integrations: None,
        }
    }

    pub fn from_error(response_id: impl Into<String>, err: &AppError) -> Self {
        Self::failure(response_id, err.status(), err.public_message())
    }

    pub fn with_integrations(mut self, report: FanoutReport) -> Self {
        self.integrations = Some(report);
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
