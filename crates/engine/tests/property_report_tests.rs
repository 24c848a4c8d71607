//! Property-based tests for the report laws.
//!
//! For arbitrary target lists, latencies and per-item outcomes:
//! - items are in target order
//! - `successful + failed == requested == items.len()`
//! - `escalation` is present iff some item needs a precondition

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Ok,
    AlreadySuspended,
    ServerError,
    Missing,
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Ok),
        Just(Outcome::AlreadySuspended),
        Just(Outcome::ServerError),
        Just(Outcome::Missing),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_suspend_report_laws(
        cases in prop::collection::vec((outcome(), 0u64..200), 1..24),
        concurrency in 1usize..8,
    ) {
        let fake = Arc::new(FakeProvider::new());
        let mut targets = Vec::with_capacity(cases.len());
        for (index, (outcome, latency_ms)) in cases.iter().enumerate() {
            let id = index as u64 + 1;
            match outcome {
                Outcome::Ok => fake.add_user(id, "user", false),
                Outcome::AlreadySuspended => fake.add_user(id, "user", true),
                Outcome::ServerError => {
                    fake.add_user(id, "user", false);
                    fake.fail_with(id, 500, None);
                }
                Outcome::Missing => {}
            }
            fake.set_latency(id, Duration::from_millis(*latency_ms));
            targets.push(rid(id));
        }
        // Reverse so target order differs from id order.
        targets.reverse();

        let job = BatchJob::for_ids(BatchAction::Suspend { reason: None }, targets.clone());
        let report = runtime()
            .block_on(coordinator(&fake, test_config(concurrency)).execute(&job))
            .expect("valid job");

        let expected: Vec<TargetKey> = targets.iter().copied().map(TargetKey::Id).collect();
        prop_assert_eq!(report_ids(&report), expected);
        prop_assert_eq!(report.successful + report.failed, report.requested);
        prop_assert_eq!(report.requested, report.items.len());
        prop_assert_eq!(report.requested, cases.len());

        let expected_ok = cases
            .iter()
            .filter(|(o, _)| matches!(o, Outcome::Ok | Outcome::AlreadySuspended))
            .count();
        prop_assert_eq!(report.successful, expected_ok);
        prop_assert!(report.escalation.is_none());
        prop_assert!(fake.max_in_flight() <= concurrency);
    }

    #[test]
    fn prop_escalation_iff_precondition(
        gated in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let fake = Arc::new(FakeProvider::with_users(1));
        let mut courses = Vec::with_capacity(gated.len());
        for (index, requires_purchase) in gated.iter().enumerate() {
            let id = 100 + index as u64;
            fake.add_course(id, "course", *requires_purchase);
            courses.push(rid(id));
        }

        let job = BatchJob::for_ids(BatchAction::Enroll { subject: rid(1) }, courses.clone());
        let report = runtime()
            .block_on(coordinator(&fake, test_config(4)).execute(&job))
            .expect("valid job");

        let blocked: Vec<TargetKey> = courses
            .iter()
            .zip(&gated)
            .filter(|(_, g)| **g)
            .map(|(c, _)| TargetKey::Id(*c))
            .collect();

        prop_assert_eq!(report.failed, blocked.len());
        match &report.escalation {
            Some(escalation) => {
                prop_assert!(!blocked.is_empty());
                prop_assert_eq!(&escalation.courses_requiring_order, &blocked);
            }
            None => prop_assert!(blocked.is_empty()),
        }
        prop_assert_eq!(
            report.escalation.is_some(),
            report.items.iter().any(|i| i.status_hint == Some(StatusHint::PreconditionRequired))
        );
    }
}
