//! Property tests for report invariants

mod common;

use catalog_metadata::{
    FixOptions, JsonItemStore, MetadataCheckResult, MetadataReport, MetadataStatus, Repairer,
};
use common::FakeExtractor;
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = MetadataStatus> {
    prop_oneof![
        Just(MetadataStatus::Fresh),
        Just(MetadataStatus::Stale),
        Just(MetadataStatus::Missing),
        Just(MetadataStatus::Breaking),
    ]
}

fn checks(statuses: &[MetadataStatus]) -> Vec<MetadataCheckResult> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| MetadataCheckResult::new(format!("file{}.parquet", i), *status, ""))
        .collect()
}

proptest! {
    #[test]
    fn fix_report_counts_balance(statuses in proptest::collection::vec(status_strategy(), 0..30)) {
        let extractor = FakeExtractor::new();
        let store = JsonItemStore::new();
        let checks = checks(&statuses);

        let report = Repairer::new(&extractor, &store).fix(&checks, FixOptions::dry_run());

        prop_assert_eq!(report.results.len(), checks.len());
        prop_assert_eq!(report.total_count(), report.success_count() + report.failure_count());
        prop_assert_eq!(report.skipped_count() + report.total_count(), checks.len());
        prop_assert_eq!(
            report.skipped_count(),
            statuses.iter().filter(|s| **s == MetadataStatus::Fresh).count()
        );
    }

    #[test]
    fn issues_are_sorted_and_complete(statuses in proptest::collection::vec(status_strategy(), 0..30)) {
        let report = MetadataReport::new(checks(&statuses));
        let issues = report.issues();

        prop_assert_eq!(issues.len(), report.total_count() - report.fresh_count());
        prop_assert!(issues.windows(2).all(|w| w[0].status >= w[1].status));
        prop_assert_eq!(report.passed(), issues.is_empty());
        prop_assert!(issues.iter().all(|r| r.status <= report.worst_status()));
    }
}
