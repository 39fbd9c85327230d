use otdb_lifecycle::state_machine::{allowed_rollbacks, allowed_transitions, validate_transition};
use otdb_lifecycle::{LifecycleConfig, StateMachineError, TransitionKind, TreeKind, TreeState};
use proptest::prelude::*;

#[test]
fn test_instance_happy_path() {
    use TreeState::*;
    let path = [Idle, Described, Prepared, Approved, Scheduled, Queued, Active, Finished, Obsolete];
    for pair in path.windows(2) {
        assert_eq!(
            validate_transition(TreeKind::Instance, pair[0], pair[1]),
            Ok(TransitionKind::Promotion),
            "{:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_finished_cannot_restart() {
    assert!(validate_transition(TreeKind::Instance, TreeState::Finished, TreeState::Active).is_err());
    assert!(validate_transition(TreeKind::Instance, TreeState::Aborted, TreeState::Scheduled).is_err());
}

#[test]
fn test_hardware_transitions() {
    assert!(validate_transition(TreeKind::Hardware, TreeState::Idle, TreeState::Active).is_ok());
    assert!(validate_transition(TreeKind::Hardware, TreeState::Active, TreeState::Obsolete).is_ok());

    // Hardware trees have no administrative rollbacks
    assert!(matches!(
        validate_transition(TreeKind::Hardware, TreeState::Active, TreeState::Idle),
        Err(StateMachineError::IllegalTransition { .. })
    ));
}

#[test]
fn test_rollbacks() {
    assert_eq!(
        validate_transition(TreeKind::Template, TreeState::Approved, TreeState::Prepared),
        Ok(TransitionKind::Rollback)
    );
    assert_eq!(
        validate_transition(TreeKind::Instance, TreeState::OnHold, TreeState::Approved),
        Ok(TransitionKind::Rollback)
    );
    // Only single steps back are administrative
    assert!(validate_transition(TreeKind::Template, TreeState::Approved, TreeState::Described).is_err());
}

#[test]
fn test_lifecycle_config_serde() {
    let config = LifecycleConfig::default()
        .with_constraint_policy(otdb_lifecycle::ConstraintPolicy::PromotionsOnly);
    let json = serde_json::to_string(&config).unwrap();
    let back: LifecycleConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.constraint_policy, config.constraint_policy);
}

fn any_state() -> impl Strategy<Value = TreeState> {
    proptest::sample::select(TreeState::ALL.to_vec())
}

fn any_kind() -> impl Strategy<Value = TreeKind> {
    prop_oneof![
        Just(TreeKind::Hardware),
        Just(TreeKind::Template),
        Just(TreeKind::DefaultTemplate),
        Just(TreeKind::Instance),
    ]
}

proptest! {
    #[test]
    fn prop_validation_matches_tables(kind in any_kind(), from in any_state(), to in any_state()) {
        let res = validate_transition(kind, from, to);
        let forward = allowed_transitions(kind, from);
        let back = allowed_rollbacks(kind, from);

        match res {
            Ok(TransitionKind::Unchanged) => prop_assert_eq!(from, to),
            Ok(TransitionKind::Promotion) => prop_assert!(forward.contains(&to)),
            Ok(TransitionKind::Rollback) => prop_assert!(back.contains(&to)),
            Err(_) => {
                prop_assert!(!forward.contains(&to));
                prop_assert!(!back.contains(&to));
            }
        }
    }

    #[test]
    fn prop_promotions_move_forward(kind in any_kind(), from in any_state()) {
        for to in allowed_transitions(kind, from) {
            prop_assert!(to > from);
        }
        for to in allowed_rollbacks(kind, from) {
            prop_assert!(to < from);
        }
    }
}
