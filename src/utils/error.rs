use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Invalid team '{value}': expected one of u21, nt")]
    InvalidGroup { value: String },

    #[error("Upstream responded with HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Upstream,
    Internal,
    Configuration,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::InvalidGroup { .. } => ErrorCategory::Input,
            ScoutError::UpstreamStatus { .. } | ScoutError::Upstream(_) => {
                ErrorCategory::Upstream
            }
            ScoutError::ConfigError { .. }
            | ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScoutError::Parse { .. }
            | ScoutError::IoError(_)
            | ScoutError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status used when the error reaches an endpoint.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input => 400,
            ErrorCategory::Upstream => 502,
            ErrorCategory::Internal | ErrorCategory::Configuration => 500,
        }
    }

    /// 給使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => self.to_string(),
            ErrorCategory::Upstream => "Failed to fetch the transfer list".to_string(),
            ErrorCategory::Internal => "Failed to process the transfer list".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Use 'u21' or 'nt' as the team parameter",
            ErrorCategory::Upstream => "Check that the source URL is reachable and try again later",
            ErrorCategory::Internal => {
                "Run scrape-once --dump-text to inspect the decoded page layout"
            }
            ErrorCategory::Configuration => "Fix the configuration file or CLI flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_category() {
        let invalid = ScoutError::InvalidGroup {
            value: "xyz".to_string(),
        };
        assert_eq!(invalid.status_code(), 400);

        let upstream = ScoutError::UpstreamStatus { status: 503 };
        assert_eq!(upstream.status_code(), 502);
        assert_eq!(upstream.to_string(), "Upstream responded with HTTP 503");

        let parse = ScoutError::Parse {
            message: "boom".to_string(),
        };
        assert_eq!(parse.status_code(), 500);
    }

    #[test]
    fn test_serialization_error_is_internal() {
        let err: ScoutError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();

        assert!(matches!(err, ScoutError::SerializationError(_)));
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_user_friendly_message_hides_internals() {
        let parse = ScoutError::Parse {
            message: "regex blew up at byte 42".to_string(),
        };
        assert!(!parse.user_friendly_message().contains("byte 42"));
    }
}
