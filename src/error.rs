use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    client::ClientError,
    form::SubmitFailure,
    response::{ApiResponse, Meta},
    validation::FieldErrors,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Form is busy")]
    Busy,

    #[error("Submit failed")]
    SubmitFailed(SubmitFailure),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorData {
    Message { error: String },
    Fields { error: String, fields: FieldErrors },
    Failure { error: String, failure: SubmitFailure },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::SubmitFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Upstream(ClientError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();

        let data = match self {
            AppError::Validation(fields) => ErrorData::Fields {
                error: message.clone(),
                fields,
            },
            AppError::SubmitFailed(failure) => ErrorData::Failure {
                error: message.clone(),
                failure,
            },
            _ => ErrorData::Message {
                error: message.clone(),
            },
        };

        let body = ApiResponse {
            message,
            data: Some(data),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
