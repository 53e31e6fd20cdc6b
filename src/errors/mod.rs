//! Error taxonomy for the Epic Games login and locker pipeline
//!
//! Terminal kinds end a login flow; `UpstreamUnavailable` and `Http` are
//! transient and may be retried by the caller. Partial locker failures are not
//! errors at all: they are collected as `PartialDataWarning` values.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpicError {
    /// Client credentials rejected by the token endpoint (operator issue)
    #[error("Authentication failed during {operation} (HTTP {status}): {detail}")]
    AuthError {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    /// Device code reached its expiry before the user completed the login
    #[error("Login link expired before it was completed")]
    AuthExpired,

    /// User or upstream explicitly declined the device authorization
    #[error("Login was denied")]
    AuthDenied,

    /// The flow was cancelled from outside (user abort, shutdown)
    #[error("Login was cancelled")]
    Cancelled,

    /// Account lookup failed: banned, deleted, or never launched the game
    #[error("Account not found: {lookup}")]
    AccountNotFound { lookup: String },

    /// Any other non-2xx from an upstream dependency
    #[error("Upstream {endpoint} unavailable (HTTP {status}): {body}")]
    UpstreamUnavailable {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Transport failure before a status code was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not match the expected document shape
    #[error("Failed to parse {document}: {error}")]
    Parse { document: String, error: String },
}

impl EpicError {
    /// Ends the login flow; retrying cannot help
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EpicError::AuthError { .. }
                | EpicError::AuthExpired
                | EpicError::AuthDenied
                | EpicError::Cancelled
                | EpicError::AccountNotFound { .. }
        )
    }

    /// Caller may retry once before surfacing the failure
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EpicError::UpstreamUnavailable { .. } | EpicError::Http(_)
        )
    }

    /// Operator-facing errors are logged, the user only sees a generic notice
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EpicError::AuthExpired
                | EpicError::AuthDenied
                | EpicError::Cancelled
                | EpicError::AccountNotFound { .. }
        )
    }

    /// Text shown to the end user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            EpicError::AuthExpired | EpicError::AuthDenied => {
                "Login link expired or was not completed."
            }
            EpicError::Cancelled => "Login cancelled.",
            EpicError::AccountNotFound { .. } => {
                "Invalid account (banned or Fortnite has not been launched)."
            }
            EpicError::UpstreamUnavailable { .. } | EpicError::Http(_) => {
                "Epic Games services are not responding right now, please try again later."
            }
            EpicError::AuthError { .. } | EpicError::Parse { .. } => {
                "The checker is temporarily unavailable, please try again later."
            }
        }
    }

    pub fn parse(document: impl Into<String>, error: impl std::fmt::Display) -> Self {
        EpicError::Parse {
            document: document.into(),
            error: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for EpicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EpicError::Http(format!("request timed out: {}", err))
        } else {
            EpicError::Http(err.to_string())
        }
    }
}

pub type EpicResult<T> = Result<T, EpicError>;

/// Non-terminal locker aggregation failure: one chunk, category or banner
/// pass was skipped and the snapshot may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDataWarning {
    /// What was skipped, e.g. `AthenaCharacter chunk 2/3` or `banners`
    pub scope: String,
    pub detail: String,
}

impl PartialDataWarning {
    pub fn new(scope: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self {
            scope: scope.into(),
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for PartialDataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} skipped: {}", self.scope, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let upstream = EpicError::UpstreamUnavailable {
            endpoint: "QueryProfile".to_string(),
            status: 503,
            body: String::new(),
        };
        assert!(upstream.is_recoverable());
        assert!(!upstream.is_terminal());

        assert!(EpicError::AuthExpired.is_terminal());
        assert!(EpicError::AuthExpired.is_user_facing());

        let auth = EpicError::AuthError {
            operation: "client_credentials",
            status: 401,
            detail: "revoked".to_string(),
        };
        assert!(auth.is_terminal());
        assert!(!auth.is_user_facing());
    }

    #[test]
    fn test_user_messages_distinguish_account_from_auth() {
        assert_ne!(
            EpicError::AuthExpired.user_message(),
            EpicError::AccountNotFound {
                lookup: "someone".to_string()
            }
            .user_message()
        );
        assert_eq!(
            EpicError::AuthDenied.user_message(),
            EpicError::AuthExpired.user_message()
        );
    }

    #[test]
    fn test_display() {
        let err = EpicError::AccountNotFound {
            lookup: "Ninja".to_string(),
        };
        assert_eq!(err.to_string(), "Account not found: Ninja");

        let warning = PartialDataWarning::new("AthenaCharacter chunk 2/3", "HTTP 500");
        assert_eq!(warning.to_string(), "AthenaCharacter chunk 2/3 skipped: HTTP 500");
    }
}
