//! Shared test utilities for the QualityHub backend.
//!
//! Unique test data generation, idempotent logging initialization, and
//! Problem Details response assertions used by both unit and integration
//! tests.

pub mod problem_details;
pub mod test_logging;
pub mod unique_helpers;
