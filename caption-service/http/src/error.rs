use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use caption_application::ApplicationError;
use caption_domain::DomainError;

#[derive(Debug)]
pub enum HttpError {
    Validation { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::NotFound { .. } => StatusCode::NOT_FOUND,
            HttpError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            HttpError::Validation { message }
            | HttpError::NotFound { message }
            | HttpError::BadGateway { message }
            | HttpError::Internal { message } => message,
        };

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}

pub fn error_mapper(error: ApplicationError) -> HttpError {
    match error {
        ApplicationError::Validation(message) => HttpError::Validation { message },
        ApplicationError::Domain(domain) => {
            let message = domain.to_string();
            match domain {
                DomainError::InvalidInput(_) => HttpError::Validation { message },
                DomainError::NotFound { .. } => HttpError::NotFound { message },
                DomainError::ExternalService { .. } => HttpError::BadGateway {
                    message: domain.message().to_string(),
                },
                DomainError::InvalidState(_) | DomainError::Internal(_) => {
                    HttpError::Internal { message }
                }
            }
        }
        ApplicationError::Internal(message) => HttpError::Internal { message },
    }
}

impl From<ApplicationError> for HttpError {
    fn from(error: ApplicationError) -> Self {
        error_mapper(error)
    }
}
