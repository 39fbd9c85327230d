//! Error types for browsing

use crate::manager::ManagerKind;
use crate::tree::NavNodeId;
use otdb_service::ServiceError;

/// Result alias for browse operations
pub type BrowseResult<T> = Result<T, BrowseError>;

/// Browse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowseError {
    /// Remote call failed or was rejected
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Node id does not belong to the tree
    #[error("unknown node {0}")]
    UnknownNode(NavNodeId),

    /// Tree was built by a different manager variant
    #[error("tree belongs to the {actual} manager, not {expected}")]
    WrongManager {
        expected: ManagerKind,
        actual: ManagerKind,
    },

    /// Component name does not resolve in the catalog
    #[error("component '{0}' not found")]
    ComponentNotFound(String),

    /// No service session could be opened for a credential
    #[error("cannot connect as {credential}: {message}")]
    Connect { credential: String, message: String },
}

impl BrowseError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_retryable(),
            Self::Connect { .. } => true,
            Self::UnknownNode(_) | Self::WrongManager { .. } | Self::ComponentNotFound(_) => false,
        }
    }
}
