//! Error types for the remote tree service boundary
//!
//! Two failure kinds cross the boundary:
//! - transport failures, which are retryable
//! - rejections, where the service ran the call but declined the change

use std::fmt::Display;

/// Result alias for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a remote tree service call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Service unreachable or the call did not complete
    #[error("remote call failed: {message}")]
    Remote { message: String },

    /// Service executed the call and declined it; nothing was changed
    #[error("{operation} rejected: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}

impl ServiceError {
    /// Create transport failure
    #[inline]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create rejection from any displayable cause
    #[inline]
    pub fn rejected(operation: &'static str, cause: impl Display) -> Self {
        Self::Rejected {
            operation,
            message: cause.to_string(),
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if the service declined the call
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Service-provided detail, suitable for showing to the user
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Remote { message } | Self::Rejected { message, .. } => message,
        }
    }
}
