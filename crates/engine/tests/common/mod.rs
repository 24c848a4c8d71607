//! Common test utilities for engine integration tests.
//!
//! # Invariants
//! - Every scenario runs against `FakeProvider` unless it exercises the real
//!   client (see `gateway_tests.rs`, which uses wiremock).
//! - Coordinators built here use short timeouts so paused-clock tests stay cheap.
//!
//! # What this does NOT handle
//! - Provider state setup beyond the common shapes (tests call `FakeProvider`
//!   setters directly).

use std::sync::Arc;
use std::time::Duration;

#[allow(unused_imports)]
pub use roster_engine::testing::FakeProvider;
#[allow(unused_imports)]
pub use roster_engine::{
    ActionKind, BatchAction, BatchActionCoordinator, BatchJob, CoordinatorConfig, ItemErrorCode,
    PartialFailureReport, ReportStatus, ResourceId, StatusHint, TargetKey,
};

/// Per-item timeout used by test coordinators.
#[allow(dead_code)]
pub const TEST_ITEM_TIMEOUT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
pub fn rid(n: u64) -> ResourceId {
    ResourceId::new(n).expect("test ids are positive")
}

#[allow(dead_code)]
pub fn ids(raw: &[u64]) -> Vec<ResourceId> {
    raw.iter().map(|n| rid(*n)).collect()
}

#[allow(dead_code)]
pub fn test_config(concurrency: usize) -> CoordinatorConfig {
    CoordinatorConfig {
        concurrency,
        item_timeout: TEST_ITEM_TIMEOUT,
        ..CoordinatorConfig::default()
    }
}

#[allow(dead_code)]
pub fn coordinator(
    fake: &Arc<FakeProvider>,
    config: CoordinatorConfig,
) -> BatchActionCoordinator<FakeProvider> {
    BatchActionCoordinator::new(Arc::clone(fake), config)
}

/// Target ids of a report, in item order.
#[allow(dead_code)]
pub fn report_ids(report: &PartialFailureReport) -> Vec<TargetKey> {
    report.items.iter().map(|i| i.target.clone()).collect()
}

/// Assert the count law every report must satisfy.
#[allow(dead_code)]
pub fn assert_counts(report: &PartialFailureReport, successful: usize, failed: usize) {
    assert_eq!(report.successful, successful, "successful count");
    assert_eq!(report.failed, failed, "failed count");
    assert_eq!(report.requested, successful + failed, "requested count");
    assert_eq!(report.items.len(), report.requested, "one item per target");
}
