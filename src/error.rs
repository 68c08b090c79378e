use thiserror::Error;

/// Main error type for the environment adapter
#[derive(Error, Debug)]
pub enum TradefestError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Game server error on {endpoint}: status {status}, body: {body}")]
    Server {
        endpoint: String,
        status: u16,
        body: String,
    },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // State machine errors
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TradefestError
pub type Result<T> = std::result::Result<T, TradefestError>;

impl TradefestError {
    /// Transport failures: the server was unreachable or answered with
    /// something that is not the agreed contract.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TradefestError::Http(_) | TradefestError::Server { .. } | TradefestError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_is_transport() {
        let err = TradefestError::Server {
            endpoint: "/step".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("/step"));
    }

    #[test]
    fn test_state_error_is_not_transport() {
        let err = TradefestError::InvalidState("step before reset".to_string());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_and_other_are_not_transport() {
        let io: TradefestError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(!io.is_transport());

        let other: TradefestError = anyhow::anyhow!("subscriber already set").into();
        assert!(!other.is_transport());
        assert_eq!(other.to_string(), "subscriber already set");
    }
}
