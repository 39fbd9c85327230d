//! In-process parameter namespace
//!
//! [`MemoryNamespaceService`] keeps the full names of each store in a radix
//! trie so `prefix*` listings only visit the matching subtrie.

use crate::error::{ServiceError, ServiceResult};
use crate::service::NamespaceService;
use async_trait::async_trait;
use parking_lot::RwLock;
use radix_trie::{Trie, TrieCommon};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Named stores of delimited parameter names
#[derive(Debug, Default)]
pub struct MemoryNamespaceService {
    stores: RwLock<HashMap<String, Trie<String, ()>>>,
    offline: AtomicBool,
}

impl MemoryNamespaceService {
    /// Create service without stores
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names to a store, creating it if needed
    pub fn insert_names<I, S>(&self, store: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stores = self.stores.write();
        let trie = stores.entry(store.to_string()).or_default();
        for name in names {
            trie.insert(name.into(), ());
        }
    }

    /// Number of names in a store
    #[must_use]
    pub fn name_count(&self, store: &str) -> usize {
        self.stores.read().get(store).map_or(0, |trie| trie.len())
    }

    /// Simulate loss of the transport
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl NamespaceService for MemoryNamespaceService {
    async fn list_names(&self, store: &str, pattern: &str) -> ServiceResult<Vec<String>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::remote("namespace service unreachable"));
        }
        let stores = self.stores.read();
        let trie = stores
            .get(store)
            .ok_or_else(|| ServiceError::rejected("list_names", format!("unknown store '{store}'")))?;

        let names = match pattern.strip_suffix('*') {
            Some(prefix) if prefix.contains('*') => {
                return Err(ServiceError::rejected(
                    "list_names",
                    format!("pattern '{pattern}' may only end in '*'"),
                ));
            }
            Some("") => trie.keys().cloned().collect(),
            Some(prefix) => trie
                .get_raw_descendant(prefix)
                .map(|sub| {
                    sub.keys()
                        .filter(|k| k.starts_with(prefix))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            None => trie
                .get(pattern)
                .map(|_| vec![pattern.to_string()])
                .unwrap_or_default(),
        };
        tracing::debug!("Listed {} names in {} for '{}'", names.len(), store, pattern);
        Ok(names)
    }
}
