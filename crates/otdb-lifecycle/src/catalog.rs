//! Component catalog
//!
//! Component definitions are the building blocks of templates: each one
//! has an ordered list of parameters, some of which reference other
//! components by name (`#RCU`).

use crate::error::StructureError;
use crate::table::NamePattern;
use crate::tree::Classification;
use otdb_node::{Node, NodeId, NodeKind, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one component definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub component_id: NodeId,
    pub name: String,
    pub version: String,
    pub classification: Classification,
    pub description: String,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    def: ComponentDef,
    params: Vec<Node>,
}

/// Store of component definitions and their parameters
#[derive(Debug, Clone)]
pub struct ComponentCatalog {
    entries: BTreeMap<NodeId, CatalogEntry>,
    next_id: u32,
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a component with its parameters
    ///
    /// Parameters receive catalog ids and are parented to the component.
    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        classification: Classification,
        description: impl Into<String>,
        params: Vec<Node>,
    ) -> NodeId {
        let component_id = self.allocate();
        let params = params
            .into_iter()
            .map(|param| {
                let id = self.allocate();
                param
                    .with_id(TreeId::CATALOG, id)
                    .with_parent(component_id)
            })
            .collect();
        let def = ComponentDef {
            component_id,
            name: name.into(),
            version: version.into(),
            classification,
            description: description.into(),
        };
        self.entries.insert(component_id, CatalogEntry { def, params });
        component_id
    }

    /// Number of components
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup component by id
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ComponentDef> {
        self.entries.get(&id).map(|e| &e.def)
    }

    /// Lookup component by exact name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ComponentDef> {
        self.entries
            .values()
            .map(|e| &e.def)
            .find(|d| d.name == name)
    }

    /// Components whose name matches `pattern`
    ///
    /// With `top_only`, components referenced by another component are
    /// left out.
    ///
    /// # Errors
    /// Returns `InvalidPattern` for patterns with more than one wildcard
    pub fn list(&self, pattern: &str, top_only: bool) -> Result<Vec<ComponentDef>, StructureError> {
        let matcher = NamePattern::parse(pattern)?;
        Ok(self
            .entries
            .values()
            .filter(|e| matcher.matches(&e.def.name))
            .filter(|e| !top_only || !self.is_referenced(&e.def.name))
            .map(|e| e.def.clone())
            .collect())
    }

    fn is_referenced(&self, name: &str) -> bool {
        self.entries.values().any(|e| {
            e.params
                .iter()
                .any(|p| p.kind == NodeKind::ComponentRef && p.name == name)
        })
    }

    /// The component as a group node
    ///
    /// # Errors
    /// Returns `ComponentNotFound` if the id is unknown
    pub fn node(&self, id: NodeId) -> Result<Node, StructureError> {
        let def = self.require(id)?;
        Ok(Node::group(def.name.clone())
            .with_id(TreeId::CATALOG, id)
            .with_description(def.description.clone()))
    }

    /// Parameters of a component in declaration order
    ///
    /// # Errors
    /// Returns `ComponentNotFound` if the id is unknown
    pub fn params(&self, id: NodeId) -> Result<&[Node], StructureError> {
        self.entries
            .get(&id)
            .map(|e| e.params.as_slice())
            .ok_or_else(|| StructureError::ComponentNotFound(id.to_string()))
    }

    fn require(&self, id: NodeId) -> Result<&ComponentDef, StructureError> {
        self.get(id)
            .ok_or_else(|| StructureError::ComponentNotFound(id.to_string()))
    }
}
