//! Operator workflow tests for `BatchConsole`.
//!
//! # Invariants
//! - A wrong delete phrase never reaches the provider
//! - The selection survives page and term changes, and failed searches
//! - The selection is cleared after any executed batch, kept after a rejection

mod common;

use std::sync::Arc;

use common::*;
use roster_config::BatchConfig;
use roster_engine::{
    BatchConsole, BatchError, ConsoleError, CoordinatorConfig, GateError, GateState, SearchError,
};

fn config(per_page: u32) -> BatchConfig {
    BatchConfig {
        per_page,
        confirm_phrase: "ELIMINAR".to_string(),
        ..BatchConfig::default()
    }
}

fn console(fake: &Arc<FakeProvider>, action: ActionKind, per_page: u32) -> BatchConsole<FakeProvider> {
    BatchConsole::new(Arc::clone(fake), action, &config(per_page))
}

#[tokio::test]
async fn test_wrong_delete_phrase_never_invokes_coordinator() {
    let fake = Arc::new(FakeProvider::with_users(3));
    let mut console = console(&fake, ActionKind::Delete, 10);
    console.search("", 1).await.unwrap();
    console.select_visible();
    console
        .open(BatchAction::Delete { reassign_to: None })
        .unwrap();

    for typed in ["", "eliminar", "ELIMINAR ", "DELETE"] {
        console.type_confirmation(typed).unwrap();
        assert!(!console.can_submit());
        let err = console.submit().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Gate(GateError::PhraseMismatch)));
        assert_eq!(console.gate().state(), GateState::AwaitingConfirm);
    }

    assert_eq!(fake.mutation_calls(), 0);
    assert_eq!(console.selection().len(), 3);

    console.type_confirmation("ELIMINAR").unwrap();
    let report = console.submit().await.unwrap();
    assert_counts(&report, 3, 0);
}

#[tokio::test]
async fn test_cancel_discards_phrase() {
    let fake = Arc::new(FakeProvider::with_users(1));
    let mut console = console(&fake, ActionKind::Delete, 10);
    console
        .open(BatchAction::Delete { reassign_to: None })
        .unwrap();
    console.type_confirmation("ELIMI").unwrap();
    console.cancel();

    assert_eq!(console.gate().state(), GateState::Cancelled);
    assert!(console.gate().typed().is_empty());
    assert!(matches!(
        console.submit().await,
        Err(ConsoleError::Gate(GateError::NotAwaiting))
    ));
}

#[tokio::test]
async fn test_selection_survives_pages_and_terms() {
    let fake = Arc::new(FakeProvider::with_users(5));
    let mut console = console(&fake, ActionKind::Suspend, 2);

    console.search("", 1).await.unwrap();
    console.select_visible();
    console.next_page().await.unwrap();
    console.toggle(rid(3)).unwrap();
    console.search("user 5", 1).await.unwrap();
    console.toggle(rid(5)).unwrap();

    assert_eq!(console.selection().snapshot(), ids(&[1, 2, 3, 5]));
}

#[tokio::test]
async fn test_select_visible_only_touches_current_page() {
    let fake = Arc::new(FakeProvider::with_users(4));
    let mut console = console(&fake, ActionKind::Suspend, 2);

    console.search("", 1).await.unwrap();
    assert_eq!(console.select_visible(), 2);
    console.next_page().await.unwrap();
    assert_eq!(console.select_visible(), 2);
    // All of page 2 selected: toggles off page 2 only.
    assert_eq!(console.select_visible(), -2);
    assert_eq!(console.selection().snapshot(), ids(&[1, 2]));
}

#[tokio::test]
async fn test_toggle_requires_visible_resource() {
    let fake = Arc::new(FakeProvider::with_users(4));
    let mut console = console(&fake, ActionKind::Suspend, 2);
    console.search("", 1).await.unwrap();
    assert!(matches!(
        console.toggle(rid(4)),
        Err(ConsoleError::NotVisible(_))
    ));
}

#[tokio::test]
async fn test_failed_search_keeps_selection() {
    let fake = Arc::new(FakeProvider::with_users(3));
    let mut console = console(&fake, ActionKind::Suspend, 10);
    console.search("", 1).await.unwrap();
    console.toggle(rid(2)).unwrap();

    fake.fail_searches(true);
    let err = console.search("anything", 1).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Search(SearchError::Failed { .. })));
    assert_eq!(console.selection().snapshot(), ids(&[2]));
    // Still on the last good page.
    assert_eq!(console.cursor().visible().len(), 3);
}

#[tokio::test]
async fn test_partial_batch_clears_selection() {
    let fake = Arc::new(FakeProvider::with_users(3));
    fake.fail_with(2, 503, None);
    let mut console = console(&fake, ActionKind::Suspend, 10);
    console.search("", 1).await.unwrap();
    console.select_visible();
    console.open(BatchAction::Suspend { reason: None }).unwrap();

    let report = console.submit().await.unwrap();
    assert_eq!(report.status, ReportStatus::Partial);
    assert!(console.selection().is_empty());
    assert_eq!(console.gate().state(), GateState::Idle);
}

#[tokio::test]
async fn test_rejected_batch_keeps_selection_state() {
    let fake = Arc::new(FakeProvider::with_users(2));
    let mut console = console(&fake, ActionKind::Unsuspend, 10);
    console.search("", 1).await.unwrap();
    console.open(BatchAction::Unsuspend).unwrap();

    // Nothing selected: every user is active, so none is eligible.
    assert_eq!(console.select_visible(), 0);
    let err = console.submit().await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Batch(BatchError::EmptyTargets(ActionKind::Unsuspend))
    ));
    assert_eq!(console.gate().state(), GateState::Idle);
    assert_eq!(fake.mutation_calls(), 0);
}

#[tokio::test]
async fn test_open_with_other_action_is_rejected() {
    let fake = Arc::new(FakeProvider::with_users(1));
    let mut console = console(&fake, ActionKind::Suspend, 10);
    assert!(matches!(
        console.open(BatchAction::Delete { reassign_to: None }),
        Err(ConsoleError::Batch(BatchError::TargetKindMismatch { .. }))
    ));
    assert_eq!(console.gate().state(), GateState::Idle);
}

#[tokio::test]
async fn test_dry_run_console_leaves_provider_untouched() {
    let fake = Arc::new(FakeProvider::with_users(2));
    let mut console = console(&fake, ActionKind::Suspend, 10).with_coordinator_config(
        CoordinatorConfig {
            dry_run: true,
            ..CoordinatorConfig::default()
        },
    );
    console.search("", 1).await.unwrap();
    console.select_visible();
    console.open(BatchAction::Suspend { reason: None }).unwrap();

    let report = console.submit().await.unwrap();
    assert!(report.dry_run);
    assert_counts(&report, 2, 0);
    assert!(!fake.is_suspended(rid(1)));
}
