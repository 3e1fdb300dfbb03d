//! PDF rendering for the report endpoints.

pub mod pdf;

pub use pdf::{render_coverage_report, render_project_summary, render_run_report};
