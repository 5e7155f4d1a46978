use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use readscore_analysis::AnalysisError;
use serde::Serialize;
use thiserror::Error;

/// Failure of an `/analyze` request as seen by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The form was readable but its content is rejected.
    #[error("{0}")]
    Validation(String),
    /// The multipart body itself could not be read.
    #[error("Malformed form data: {0}")]
    MalformedForm(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::MalformedForm(_) => "bad_request",
            ApiError::Analysis(err) => match err {
                AnalysisError::SubmissionFailed(_) => "submission_failed",
                AnalysisError::QueryFailed(_) => "status_query_failed",
                AnalysisError::JobFailed(_) => "transcription_failed",
                AnalysisError::JobTimeout { .. } => "transcription_timeout",
                AnalysisError::CompletionFailed(_) => "comparison_failed",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
