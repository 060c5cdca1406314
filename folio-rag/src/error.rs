//! Error types for configuration and answer generation

/// Startup configuration problems. These are fatal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    MissingVar { name: &'static str },

    #[error("{name} must be an http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },
}

/// Failure of a chat completion, after the client's own retries.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid chat client configuration: {message}")]
    InvalidConfig { message: String },

    #[error("request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    #[error("completion endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid completion response: {message}")]
    InvalidResponse { message: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
