//! Pure statistics over coverage links and run results.

use serde::Serialize;

use crate::entities::test_results::ResultStatus;

/// `round(part / total * 100)`, defined as 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub total_requirements: u64,
    pub covered_requirements: u64,
    pub uncovered_requirements: u64,
    pub coverage_percentage: u32,
}

impl CoverageStats {
    pub fn compute(total: u64, covered: u64) -> Self {
        debug_assert!(covered <= total);
        Self {
            total_requirements: total,
            covered_requirements: covered,
            uncovered_requirements: total - covered,
            coverage_percentage: percentage(covered, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
    pub skipped: u64,
    pub untested: u64,
    /// Results in any status other than UNTESTED.
    pub executed: u64,
    pub completion_percentage: u32,
    pub pass_percentage: u32,
}

impl RunStats {
    pub fn from_counts(counts: &[(ResultStatus, i64)]) -> Self {
        let mut passed = 0u64;
        let mut failed = 0u64;
        let mut blocked = 0u64;
        let mut skipped = 0u64;
        let mut untested = 0u64;
        for (status, count) in counts {
            let count = (*count).max(0) as u64;
            match status {
                ResultStatus::Passed => passed += count,
                ResultStatus::Failed => failed += count,
                ResultStatus::Blocked => blocked += count,
                ResultStatus::Skipped => skipped += count,
                ResultStatus::Untested => untested += count,
            }
        }
        let total = passed + failed + blocked + skipped + untested;
        let executed = total - untested;
        Self {
            total,
            passed,
            failed,
            blocked,
            skipped,
            untested,
            executed,
            completion_percentage: percentage(executed, total),
            pass_percentage: percentage(passed, executed),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{percentage, CoverageStats, RunStats};
    use crate::entities::test_results::ResultStatus;

    #[test]
    fn percentage_spec_examples() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 2), 100);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(0, 5), 0);
    }

    #[test]
    fn coverage_empty_project() {
        let stats = CoverageStats::compute(0, 0);
        assert_eq!(stats.total_requirements, 0);
        assert_eq!(stats.covered_requirements, 0);
        assert_eq!(stats.uncovered_requirements, 0);
        assert_eq!(stats.coverage_percentage, 0);
    }

    #[test]
    fn coverage_fully_covered() {
        let stats = CoverageStats::compute(2, 2);
        assert_eq!(stats.coverage_percentage, 100);
        assert_eq!(stats.uncovered_requirements, 0);
    }

    #[test]
    fn run_stats_tallies() {
        let counts = vec![
            (ResultStatus::Passed, 6),
            (ResultStatus::Failed, 2),
            (ResultStatus::Untested, 2),
        ];
        let stats = RunStats::from_counts(&counts);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.executed, 8);
        assert_eq!(stats.completion_percentage, 80);
        assert_eq!(stats.pass_percentage, 75);
    }

    #[test]
    fn run_stats_empty() {
        let stats = RunStats::from_counts(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_percentage, 0);
        assert_eq!(stats.pass_percentage, 0);
    }

    proptest! {
        #[test]
        fn percentage_bounded(covered in 0u64..=1000, extra in 0u64..=1000) {
            let total = covered + extra;
            let pct = percentage(covered, total);
            prop_assert!(pct <= 100);
        }

        #[test]
        fn coverage_parts_sum(covered in 0u64..=500, extra in 0u64..=500) {
            let total = covered + extra;
            let stats = CoverageStats::compute(total, covered);
            prop_assert_eq!(
                stats.covered_requirements + stats.uncovered_requirements,
                stats.total_requirements
            );
        }

        #[test]
        fn run_tallies_sum(
            passed in 0i64..=200,
            failed in 0i64..=200,
            blocked in 0i64..=200,
            skipped in 0i64..=200,
            untested in 0i64..=200,
        ) {
            let counts = vec![
                (ResultStatus::Passed, passed),
                (ResultStatus::Failed, failed),
                (ResultStatus::Blocked, blocked),
                (ResultStatus::Skipped, skipped),
                (ResultStatus::Untested, untested),
            ];
            let stats = RunStats::from_counts(&counts);
            prop_assert_eq!(
                stats.passed + stats.failed + stats.blocked + stats.skipped + stats.untested,
                stats.total
            );
            prop_assert_eq!(stats.executed, stats.total - stats.untested);
            prop_assert!(stats.completion_percentage <= 100);
            prop_assert!(stats.pass_percentage <= 100);
        }
    }
}
