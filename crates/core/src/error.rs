use crate::constants::GENERIC_REQUEST_ERROR;

/// Every failure an intake action can surface.
///
/// The first three variants are the taxonomy the status regions care about:
/// client-side validation, transport and application (non-success HTTP status)
/// failures. The remainder only arise from the local config store writer or from
/// a success body with an unexpected shape.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("registry responded with status {status}: {message}")]
    Application { status: u16, message: String },
    #[error("failed to write config storage: {0}")]
    Storage(std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to decode registry response: {0}")]
    Decode(serde_json::Error),
}

impl IntakeError {
    /// Builds an application error from a raw error body.
    ///
    /// Uses the string `message` field of a JSON object body when there is one,
    /// otherwise the generic request error text.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| GENERIC_REQUEST_ERROR.to_owned());

        IntakeError::Application { status, message }
    }

    /// Text shown in a status region for this error.
    ///
    /// Validation and application errors render their bare message; the other
    /// variants render their full description.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Validation(message) => message.clone(),
            IntakeError::Application { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IntakeError::Validation(_))
    }
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
