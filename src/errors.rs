use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Graph API error ({status}): {message}")]
    GraphApi { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Helper for mapping any transport-level failure into `AppError::Transport`
pub fn transport_error<E: ToString>(err: E) -> AppError {
    AppError::Transport(err.to_string())
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_api_error_renders_status_and_message() {
        let err = AppError::GraphApi {
            status: 400,
            message: "Invalid OAuth access token".into(),
        };
        assert_eq!(
            err.to_string(),
            "Graph API error (400): Invalid OAuth access token"
        );
    }

    #[test]
    fn transport_error_keeps_original_text() {
        let err = transport_error("connection reset");
        assert!(matches!(err, AppError::Transport(ref m) if m == "connection reset"));
    }
}
