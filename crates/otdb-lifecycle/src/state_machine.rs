use crate::error::StateMachineError;
use crate::tree::{TreeKind, TreeState};
use serde::{Deserialize, Serialize};

/// How a validated transition moves through the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Target equals current state; nothing to commit
    Unchanged,
    /// Forward move
    Promotion,
    /// Administrative step back
    Rollback,
}

/// When constraint checking gates a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstraintPolicy {
    /// Check before every transition
    #[default]
    Always,
    /// Check before promotions only; rollbacks commit directly
    PromotionsOnly,
}

impl ConstraintPolicy {
    /// Whether a transition of this kind must pass constraint checking
    #[inline]
    #[must_use]
    pub fn requires_check(self, transition: TransitionKind) -> bool {
        match (self, transition) {
            (_, TransitionKind::Unchanged) => false,
            (Self::Always, _) => true,
            (Self::PromotionsOnly, t) => t == TransitionKind::Promotion,
        }
    }
}

/// Lifecycle configuration for a tree store
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    pub constraint_policy: ConstraintPolicy,
}

impl LifecycleConfig {
    /// With constraint policy
    #[inline]
    #[must_use]
    pub fn with_constraint_policy(mut self, policy: ConstraintPolicy) -> Self {
        self.constraint_policy = policy;
        self
    }
}

/// Validates a state transition for a tree of the given kind.
pub fn validate_transition(
    kind: TreeKind,
    from: TreeState,
    to: TreeState,
) -> Result<TransitionKind, StateMachineError> {
    if from == to {
        Ok(TransitionKind::Unchanged)
    } else if allowed_transitions(kind, from).contains(&to) {
        Ok(TransitionKind::Promotion)
    } else if allowed_rollbacks(kind, from).contains(&to) {
        Ok(TransitionKind::Rollback)
    } else {
        Err(StateMachineError::IllegalTransition { kind, from, to })
    }
}

/// Forward transitions out of `from`.
pub fn allowed_transitions(kind: TreeKind, from: TreeState) -> Vec<TreeState> {
    use TreeState::*;
    match kind {
        TreeKind::Hardware => match from {
            Idle => vec![Active, Obsolete],
            Active => vec![Obsolete],
            _ => vec![],
        },
        TreeKind::Template | TreeKind::DefaultTemplate => match from {
            Idle => vec![Described, Obsolete],
            Described => vec![Prepared, Obsolete],
            Prepared => vec![Approved, Obsolete],
            Approved => vec![Obsolete],
            _ => vec![],
        },
        TreeKind::Instance => match from {
            Idle => vec![Described, Obsolete],
            Described => vec![Prepared, Obsolete],
            Prepared => vec![Approved, Obsolete],
            Approved => vec![OnHold, Scheduled, Obsolete],
            OnHold => vec![Obsolete],
            Scheduled => vec![Queued, Aborted, Obsolete],
            Queued => vec![Active, Aborted],
            Active => vec![Completing, Finished, Aborted, Failed],
            Completing => vec![Finished, Aborted, Failed],
            Finished | Aborted | Failed => vec![Obsolete],
            Obsolete => vec![],
        },
    }
}

/// Administrative rollbacks out of `from`.
pub fn allowed_rollbacks(kind: TreeKind, from: TreeState) -> Vec<TreeState> {
    use TreeState::*;
    match (kind, from) {
        (TreeKind::Hardware, _) => vec![],
        (_, Approved) => vec![Prepared],
        (_, Prepared) => vec![Described],
        (TreeKind::Instance, Scheduled | OnHold) => vec![Approved],
        _ => vec![],
    }
}
