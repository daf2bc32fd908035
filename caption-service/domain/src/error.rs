use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(message: &str) -> Self {
        Self::InvalidInput(message.to_string())
    }

    pub fn invalid_state(message: &str) -> Self {
        Self::InvalidState(message.to_string())
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn external_service_error(service: &str, message: &str) -> Self {
        Self::ExternalService {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self::Internal(message.to_string())
    }

    /// Message without the variant prefix, as the upstream service reported it.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidState(message)
            | Self::Internal(message) => message,
            Self::NotFound { id, .. } => id,
            Self::ExternalService { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_service_message_is_kept_verbatim() {
        let error = DomainError::external_service_error("transcription", "Audio file is too short");
        assert_eq!(error.message(), "Audio file is too short");
        assert_eq!(
            error.to_string(),
            "transcription error: Audio file is too short"
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        let error = DomainError::not_found("history state", "abc");
        assert_eq!(error.to_string(), "history state not found: abc");
    }
}
