use crate::utils::error::{DomainError, ErrorKind, RemoteError};

// 整句片語比對，NotFound 先於 InvalidArgument
const NOT_FOUND_HINTS: [&str; 5] = [
    "the employee don't exist",
    "does not exist",
    "doesn't exist",
    "not found",
    "no such employee",
];

const INVALID_ARGUMENT_HINTS: [&str; 4] = [
    "division by zero",
    "modulo by zero",
    "the employee already exist",
    "invalid argument",
];

/// Maps a raw remote failure onto the domain taxonomy.
///
/// The fault code wins when it names a category; otherwise the message is
/// inspected. Anything undeterminable is a `RemoteFailure`. The remote
/// message is carried over unchanged.
pub fn classify(error: RemoteError) -> DomainError {
    match error {
        RemoteError::Fault { code, message } => {
            let kind = kind_from_code(&code).unwrap_or_else(|| kind_from_message(&message));
            with_kind(kind, message)
        }
        RemoteError::Status { status, body } => {
            let message = if body.trim().is_empty() {
                format!("HTTP status {}", status)
            } else {
                body
            };
            match status {
                400 | 422 => DomainError::invalid_argument(message),
                _ => DomainError::remote_failure(message),
            }
        }
        local @ (RemoteError::Arity { .. } | RemoteError::WrongService { .. }) => {
            DomainError::invalid_argument(local.to_string())
        }
        other => DomainError::remote_failure(other.to_string()),
    }
}

impl From<RemoteError> for DomainError {
    fn from(error: RemoteError) -> Self {
        classify(error)
    }
}

fn kind_from_code(code: &str) -> Option<ErrorKind> {
    match code.trim().to_ascii_lowercase().as_str() {
        "invalidargument" | "invalid_argument" | "sender" | "client" => {
            Some(ErrorKind::InvalidArgument)
        }
        "notfound" | "not_found" => Some(ErrorKind::NotFound),
        _ => None,
    }
}

fn kind_from_message(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    if NOT_FOUND_HINTS.iter().any(|hint| lowered.contains(hint)) {
        ErrorKind::NotFound
    } else if INVALID_ARGUMENT_HINTS.iter().any(|hint| lowered.contains(hint)) {
        ErrorKind::InvalidArgument
    } else {
        ErrorKind::RemoteFailure
    }
}

fn with_kind(kind: ErrorKind, message: String) -> DomainError {
    match kind {
        ErrorKind::InvalidArgument => DomainError::InvalidArgument { message },
        ErrorKind::NotFound => DomainError::NotFound { message },
        ErrorKind::RemoteFailure => DomainError::RemoteFailure { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fault(code: &str, message: &str) -> RemoteError {
        RemoteError::Fault {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_receiver_faults_are_classified_by_message() {
        let err = classify(fault("Receiver", "Division by zero."));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "Division by zero.");

        let err = classify(fault("Receiver", "The employee already exist."));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = classify(fault("Receiver", "The employee don't exist."));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "The employee don't exist.");
    }

    #[test]
    fn test_fault_code_takes_precedence() {
        let err = classify(fault("NotFound", "no such record: invalid key"));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = classify(fault("Sender", "bad request"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_unknown_category_defaults_to_remote_failure() {
        let err = classify(fault("Receiver", "Database is on fire"));
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert_eq!(err.message(), "Database is on fire");

        let err = classify(RemoteError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
    }

    #[test]
    fn test_loose_words_do_not_decide_the_kind() {
        let err = classify(fault("Receiver", "Internal error: unknown exception in handler"));
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);

        let err = classify(fault("Receiver", "Employee 'invalid-login' was not found"));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = classify(fault("Receiver", "Invalid XML returned by backend database"));
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);

        let err = classify(fault("Receiver", "Invalid argument: salary must be positive"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_http_status_mapping() {
        let err = classify(RemoteError::Status {
            status: 400,
            body: "missing operation".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "missing operation");

        let err = classify(RemoteError::Status {
            status: 503,
            body: String::new(),
        });
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert_eq!(err.message(), "HTTP status 503");
    }

    #[test]
    fn test_local_arity_error_is_invalid_argument() {
        let err: DomainError = RemoteError::Arity {
            operation: "add",
            expected: 2,
            actual: 1,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message().contains("add"));
    }
}
