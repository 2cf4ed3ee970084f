use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 遠端呼叫邊界上的原始錯誤，只在 gateway 與 translator 之間流動
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Remote endpoint answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote fault ({code}): {message}")]
    Fault { code: String, message: String },

    #[error("Malformed remote payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Operation {operation} expects {expected} argument(s), got {actual}")]
    Arity {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Operation {operation} is not offered by the {service} service")]
    WrongService {
        operation: &'static str,
        service: &'static str,
    },
}

/// Coarse error kind callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    RemoteFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::RemoteFailure => "RemoteFailure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An employee is transitively listed as their own boss.
    #[error("Cycle detected: {message}")]
    CycleDetected { message: String, chain: Vec<String> },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Remote failure: {message}")]
    RemoteFailure { message: String },
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn remote_failure(message: impl Into<String>) -> Self {
        Self::RemoteFailure {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidArgument { .. } | DomainError::CycleDetected { .. } => {
                ErrorKind::InvalidArgument
            }
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::RemoteFailure { .. } => ErrorKind::RemoteFailure,
        }
    }

    /// The diagnostic message, verbatim.
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidArgument { message }
            | DomainError::CycleDetected { message, .. }
            | DomainError::NotFound { message }
            | DomainError::RemoteFailure { message } => message,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, DomainError::CycleDetected { .. })
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DomainError::NotFound { .. } => ErrorSeverity::Low,
            DomainError::InvalidArgument { .. } => ErrorSeverity::Medium,
            DomainError::CycleDetected { .. } => ErrorSeverity::High,
            DomainError::RemoteFailure { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DomainError::InvalidArgument { .. } => "Check the arguments passed to the operation",
            DomainError::CycleDetected { .. } => {
                "Fix the boss references of the listed employees in the directory"
            }
            DomainError::NotFound { .. } => "List the known identities and retry with one of them",
            DomainError::RemoteFailure { .. } => {
                "Check that the service endpoint is reachable or raise the timeout"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("[{}] {}", self.kind(), self.message())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl ConfigError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConfigError::IoError(_) => "Make sure the configuration file exists and is readable",
            ConfigError::InvalidConfigValueError { .. } => "Correct the value and try again",
            ConfigError::ConfigValidationError { .. } => "Make sure the file is valid TOML",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("Configuration problem: {}", self)
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_is_invalid_argument_kind() {
        let err = DomainError::CycleDetected {
            message: "a -> b -> a".to_string(),
            chain: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.is_cycle());
        assert_eq!(err.message(), "a -> b -> a");
    }

    #[test]
    fn test_user_friendly_message_keeps_original_text() {
        let err = DomainError::invalid_argument("Division by zero.");
        assert_eq!(err.user_friendly_message(), "[InvalidArgument] Division by zero.");
        assert_eq!(err.to_string(), "Invalid argument: Division by zero.");
    }
}
