//! Browse configuration

use otdb_node::{COMPONENT_MARKER, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Settings shared by every tree manager of a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Segment separator of namespace names
    pub namespace_separator: char,
    /// Prefix shown in front of component reference names
    ///
    /// Display only. Stored names always spell references with
    /// [`COMPONENT_MARKER`], whatever this is set to.
    pub component_marker: char,
    /// Name of the root returned when nothing is selected
    pub placeholder_name: String,
    /// Buffered insertion events per tree before slow subscribers lag
    pub event_capacity: usize,
}

impl BrowseConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With namespace separator
    #[inline]
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.namespace_separator = separator;
        self
    }

    /// With displayed component marker
    #[inline]
    #[must_use]
    pub fn with_component_marker(mut self, marker: char) -> Self {
        self.component_marker = marker;
        self
    }

    /// With placeholder root name
    #[inline]
    #[must_use]
    pub fn with_placeholder_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_name = name.into();
        self
    }

    /// With event buffer capacity
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            namespace_separator: DEFAULT_SEPARATOR,
            component_marker: COMPONENT_MARKER,
            placeholder_name: "No selection".to_string(),
            event_capacity: 256,
        }
    }
}
