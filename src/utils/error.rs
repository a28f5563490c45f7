use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("{message}")]
    StoreError { status: u16, message: String },

    #[error("Form field '{field}' is missing from the view")]
    MissingFieldError { field: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidFieldError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Session error: {message}")]
    SessionError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Store,
    Validation,
    Contract,
    Session,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BillError {
    pub fn store(status: u16) -> Self {
        BillError::StoreError {
            status,
            message: format!("Erreur {}", status),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BillError::HttpError(_) | BillError::UrlError(_) => ErrorCategory::Network,
            BillError::StoreError { .. } => ErrorCategory::Store,
            BillError::InvalidFieldError { .. } => ErrorCategory::Validation,
            BillError::MissingFieldError { .. } => ErrorCategory::Contract,
            BillError::SessionError { .. } => ErrorCategory::Session,
            BillError::ConfigError { .. }
            | BillError::ConfigValidationError { .. }
            | BillError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BillError::IoError(_) | BillError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Store => ErrorSeverity::Medium,
            ErrorCategory::Session | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Contract | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI. Never zero: a returned error means the
    /// command did not do what was asked.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Status code carried by a store failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BillError::StoreError { status, .. } => Some(*status),
            BillError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check the API endpoint and your network connection, then retry".to_string()
            }
            ErrorCategory::Store => match self.status() {
                Some(401) | Some(403) => "Sign in again to refresh the session token".to_string(),
                Some(404) => "Verify the API endpoint path".to_string(),
                Some(status) if status >= 500 => {
                    "The bill service is failing; retry later".to_string()
                }
                _ => "Retry the operation".to_string(),
            },
            ErrorCategory::Validation => {
                "Correct the highlighted value and submit again".to_string()
            }
            ErrorCategory::Contract => {
                "The form markup does not match the controller; this is a bug".to_string()
            }
            ErrorCategory::Session => {
                "Provide a session file with a 'user' entry holding type and email".to_string()
            }
            ErrorCategory::Configuration => "Review the configuration file and flags".to_string(),
            ErrorCategory::System => "Check file permissions and disk state".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillError::StoreError { message, .. } => message.clone(),
            BillError::MissingFieldError { field } => {
                format!("Le champ '{}' est introuvable dans le formulaire", field)
            }
            BillError::InvalidFieldError { field, value, .. } => {
                format!("Valeur invalide pour '{}': {}", field, value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_displays_literal_message() {
        let err = BillError::store(404);
        assert_eq!(err.to_string(), "Erreur 404");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.category(), ErrorCategory::Store);
    }

    #[test]
    fn test_severity_ordering() {
        let missing = BillError::MissingFieldError {
            field: "amount".to_string(),
        };
        let rejected = BillError::InvalidFieldError {
            field: "amount".to_string(),
            value: "douze".to_string(),
            reason: "Amount must be a number".to_string(),
        };
        assert_eq!(missing.severity(), ErrorSeverity::Critical);
        assert!(rejected.severity() < BillError::store(500).severity());
    }

    #[test]
    fn test_refused_submission_exits_non_zero() {
        let bad_amount = BillError::InvalidFieldError {
            field: "amount".to_string(),
            value: "douze".to_string(),
            reason: "Amount must be a number".to_string(),
        };
        let bad_type = BillError::InvalidFieldError {
            field: "expense-type".to_string(),
            value: "Voyage".to_string(),
            reason: "Unknown expense type".to_string(),
        };
        assert_eq!(bad_amount.exit_code(), 2);
        assert_eq!(bad_type.exit_code(), 2);

        for err in [
            BillError::store(404),
            BillError::MissingFieldError {
                field: "pct".to_string(),
            },
            BillError::SessionError {
                message: "no user".to_string(),
            },
        ] {
            assert_ne!(err.exit_code(), 0, "{err:?} must fail the process");
        }
    }
}
