use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Resource not found: {message}")]
    NotFoundError { message: String },

    #[error("Resource already exists: {message}")]
    AlreadyExistsError { message: String },

    #[error("Service returned HTTP {status} ({code}): {message}")]
    ApiError {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Subscriber error: {message}")]
    SubscriberError { message: String },
}

pub type Result<T> = std::result::Result<T, SampleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Authentication,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// 服務端回傳的錯誤主體，例如 `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl SampleError {
    /// 依 HTTP 狀態碼與回應內容建立錯誤，服務的錯誤訊息原樣保留
    pub fn from_response(status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.status, envelope.error.message),
            Err(_) => (String::new(), body.trim().to_string()),
        };

        match status {
            404 => SampleError::NotFoundError { message },
            409 if code.is_empty() || code == "ALREADY_EXISTS" => {
                SampleError::AlreadyExistsError { message }
            }
            401 | 403 => SampleError::AuthError { message },
            _ => SampleError::ApiError {
                status,
                code,
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SampleError::NotFoundError { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, SampleError::AlreadyExistsError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SampleError::HttpError(_) => ErrorCategory::Network,
            SampleError::NotFoundError { .. }
            | SampleError::AlreadyExistsError { .. }
            | SampleError::ApiError { .. }
            | SampleError::SubscriberError { .. } => ErrorCategory::Service,
            SampleError::AuthError { .. } => ErrorCategory::Authentication,
            SampleError::ConfigError { .. }
            | SampleError::ConfigValidationError { .. }
            | SampleError::InvalidConfigValueError { .. }
            | SampleError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SampleError::SerializationError(_) | SampleError::CsvError(_) => ErrorCategory::Data,
            SampleError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SampleError::AlreadyExistsError { .. } => ErrorSeverity::Low,
            SampleError::HttpError(_) | SampleError::SubscriberError { .. } => {
                ErrorSeverity::Medium
            }
            SampleError::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            SampleError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SampleError::HttpError(_) => "Could not reach the remote service".to_string(),
            SampleError::NotFoundError { message } => format!("Not found: {}", message),
            SampleError::AlreadyExistsError { message } => {
                format!("Already exists: {}", message)
            }
            SampleError::ApiError { status, message, .. } => {
                format!("The service rejected the request (HTTP {}): {}", status, message)
            }
            SampleError::AuthError { .. } => "The request was not authorized".to_string(),
            SampleError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the configured endpoints",
            ErrorCategory::Service => "Check the resource names and project id, then retry",
            ErrorCategory::Authentication => {
                "Provide a valid access token (GOOGLE_OAUTH_ACCESS_TOKEN) or run on a host with a metadata server"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Data => "The service returned data that could not be processed",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_parses_service_error_body() {
        let body = r#"{"error":{"code":404,"message":"note not found","status":"NOT_FOUND"}}"#;
        let err = SampleError::from_response(404, body);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resource not found: note not found");
    }

    #[test]
    fn test_from_response_keeps_status_code() {
        let body = r#"{"error":{"code":400,"message":"bad filter","status":"INVALID_ARGUMENT"}}"#;
        match SampleError::from_response(400, body) {
            SampleError::ApiError {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "INVALID_ARGUMENT");
                assert_eq!(message, "bad filter");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_response_with_plain_text_body() {
        let err = SampleError::from_response(502, "bad gateway\n");
        assert_eq!(err.category(), ErrorCategory::Service);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_conflict_and_auth_mapping() {
        assert!(SampleError::from_response(409, "{}").is_already_exists());
        let auth = SampleError::from_response(403, "{}");
        assert_eq!(auth.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn test_aborted_conflict_is_not_already_exists() {
        let body = r#"{"error": {"code": 409, "message": "transaction aborted", "status": "ABORTED"}}"#;
        let err = SampleError::from_response(409, body);

        assert!(!err.is_already_exists());
        assert!(matches!(
            err,
            SampleError::ApiError { status: 409, ref code, .. } if code == "ABORTED"
        ));
    }
}
