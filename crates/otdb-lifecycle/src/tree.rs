//! Tree records
//!
//! Defines the metadata record the store keeps for every tree, together
//! with the kind, classification and state enums.

use chrono::{DateTime, Utc};
use otdb_node::TreeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a tree describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeKind {
    /// Physical instrument catalog (PIC)
    Hardware,
    /// Structural skeleton without array replication
    Template,
    /// Template used as the starting point for new templates
    DefaultTemplate,
    /// Concrete observation with every replica expanded
    Instance,
}

impl TreeKind {
    /// Whether trees of this kind are templates
    #[inline]
    #[must_use]
    pub fn is_template(self) -> bool {
        matches!(self, Self::Template | Self::DefaultTemplate)
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hardware => "hardware",
            Self::Template => "template",
            Self::DefaultTemplate => "default-template",
            Self::Instance => "instance",
        };
        f.write_str(name)
    }
}

/// Orthogonal tag on a tree, independent of lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Development,
    Test,
    Operational,
    Example,
}

/// Lifecycle state of a tree
///
/// Declaration order is lifecycle order; forward transitions always move to
/// a later state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreeState {
    Idle,
    Described,
    Prepared,
    Approved,
    OnHold,
    Scheduled,
    Queued,
    Active,
    Completing,
    Finished,
    Aborted,
    Failed,
    Obsolete,
}

impl TreeState {
    /// All states in lifecycle order
    pub const ALL: [Self; 13] = [
        Self::Idle,
        Self::Described,
        Self::Prepared,
        Self::Approved,
        Self::OnHold,
        Self::Scheduled,
        Self::Queued,
        Self::Active,
        Self::Completing,
        Self::Finished,
        Self::Aborted,
        Self::Failed,
        Self::Obsolete,
    ];

    /// Run has ended, successfully or not
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted | Self::Failed)
    }

    /// No further edits or reclassification are accepted
    #[inline]
    #[must_use]
    pub fn is_closed(self) -> bool {
        self.is_terminal() || self == Self::Obsolete
    }

    /// Observation is being carried out
    #[inline]
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Queued | Self::Active | Self::Completing)
    }

    /// Structure may still be changed
    #[inline]
    #[must_use]
    pub fn is_editable(self) -> bool {
        self < Self::Active
    }

    /// State requires a valid schedule on instance trees
    #[inline]
    #[must_use]
    pub fn needs_schedule(self) -> bool {
        (Self::Scheduled..=Self::Completing).contains(&self)
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Planned observation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl Schedule {
    /// Create schedule window
    #[inline]
    #[must_use]
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self { start, stop }
    }

    /// Start strictly precedes stop
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start < self.stop
    }
}

/// Metadata record for one tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeInfo {
    pub tree_id: TreeId,
    pub kind: TreeKind,
    pub classification: Classification,
    pub state: TreeState,
    pub campaign: String,
    pub mom_id: Option<u32>,
    pub description: String,
    pub schedule: Option<Schedule>,
    /// Tree this one was copied or instantiated from
    pub original_tree_id: Option<TreeId>,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

impl TreeInfo {
    /// Create record for a fresh tree
    #[must_use]
    pub fn new(tree_id: TreeId, kind: TreeKind, classification: Classification) -> Self {
        Self {
            tree_id,
            kind,
            classification,
            state: initial_state(kind),
            campaign: String::new(),
            mom_id: None,
            description: String::new(),
            schedule: None,
            original_tree_id: None,
            creator: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// State a newly created tree of the given kind starts in
#[inline]
#[must_use]
pub fn initial_state(kind: TreeKind) -> TreeState {
    match kind {
        TreeKind::Hardware => TreeState::Idle,
        TreeKind::Template | TreeKind::DefaultTemplate | TreeKind::Instance => {
            TreeState::Described
        }
    }
}
