//! Manager registry
//!
//! One manager per (credential, variant) is built on first use and shared
//! afterwards, so every consumer using the same credential talks to the
//! same service session.

use crate::component::ComponentManager;
use crate::config::BrowseConfig;
use crate::error::BrowseResult;
use crate::instrument::InstrumentManager;
use crate::manager::{ManagerKind, TreeManager};
use crate::namespace::NamespaceManager;
use async_trait::async_trait;
use dashmap::DashMap;
use otdb_service::{NamespaceService, RemoteTreeService};
use std::fmt;
use std::sync::Arc;

/// Caller identity a service session is opened for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    pub user: String,
    pub database: String,
}

impl Credential {
    #[must_use]
    pub fn new(user: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            database: database.into(),
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.database)
    }
}

/// Opens service sessions for a credential
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Tree service session
    ///
    /// # Errors
    /// Returns `BrowseError::Connect` if no session can be opened
    async fn tree_service(&self, credential: &Credential) -> BrowseResult<Arc<dyn RemoteTreeService>>;

    /// Namespace service session
    ///
    /// # Errors
    /// Returns `BrowseError::Connect` if no session can be opened
    async fn namespace_service(
        &self,
        credential: &Credential,
    ) -> BrowseResult<Arc<dyn NamespaceService>>;
}

/// Connector handing out the same services to every credential
#[derive(Clone)]
pub struct SharedConnector {
    tree: Arc<dyn RemoteTreeService>,
    namespace: Arc<dyn NamespaceService>,
}

impl SharedConnector {
    #[must_use]
    pub fn new(tree: Arc<dyn RemoteTreeService>, namespace: Arc<dyn NamespaceService>) -> Self {
        Self { tree, namespace }
    }
}

impl fmt::Debug for SharedConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedConnector").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionConnector for SharedConnector {
    async fn tree_service(&self, _credential: &Credential) -> BrowseResult<Arc<dyn RemoteTreeService>> {
        Ok(Arc::clone(&self.tree))
    }

    async fn namespace_service(
        &self,
        _credential: &Credential,
    ) -> BrowseResult<Arc<dyn NamespaceService>> {
        Ok(Arc::clone(&self.namespace))
    }
}

/// Cache of tree managers keyed by credential and variant
pub struct ManagerRegistry {
    connector: Arc<dyn SessionConnector>,
    config: BrowseConfig,
    managers: DashMap<(Credential, ManagerKind), Arc<dyn TreeManager>>,
}

impl ManagerRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new(connector: Arc<dyn SessionConnector>, config: BrowseConfig) -> Self {
        Self {
            connector,
            config,
            managers: DashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    /// Manager for a credential, built on first request
    ///
    /// Concurrent first requests may both connect; the first manager stored
    /// wins and is returned to both.
    ///
    /// # Errors
    /// Returns the connector's error if no session can be opened
    pub async fn manager(
        &self,
        credential: &Credential,
        kind: ManagerKind,
    ) -> BrowseResult<Arc<dyn TreeManager>> {
        let key = (credential.clone(), kind);
        let cached = self.managers.get(&key).map(|m| Arc::clone(m.value()));
        if let Some(manager) = cached {
            return Ok(manager);
        }

        let manager = self.build(credential, kind).await?;
        tracing::info!("Opened {} manager for {}", kind, credential);
        let stored = self.managers.entry(key).or_insert(manager);
        Ok(Arc::clone(stored.value()))
    }

    async fn build(
        &self,
        credential: &Credential,
        kind: ManagerKind,
    ) -> BrowseResult<Arc<dyn TreeManager>> {
        let config = self.config.clone();
        let manager: Arc<dyn TreeManager> = match kind {
            ManagerKind::Instrument => Arc::new(InstrumentManager::new(
                self.connector.tree_service(credential).await?,
                config,
            )),
            ManagerKind::Component => Arc::new(ComponentManager::new(
                self.connector.tree_service(credential).await?,
                config,
            )),
            ManagerKind::Namespace => Arc::new(NamespaceManager::new(
                self.connector.namespace_service(credential).await?,
                config,
            )),
        };
        Ok(manager)
    }

    /// Drop every manager of a credential; returns how many were dropped
    pub fn evict(&self, credential: &Credential) -> usize {
        let before = self.managers.len();
        self.managers.retain(|(owner, _), _| owner != credential);
        let evicted = before.saturating_sub(self.managers.len());
        if evicted > 0 {
            tracing::info!("Evicted {} managers for {}", evicted, credential);
        }
        evicted
    }

    /// Number of cached managers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerRegistry")
            .field("config", &self.config)
            .field("managers", &self.managers.len())
            .finish_non_exhaustive()
    }
}
