pub mod attachments;
pub mod milestones;
pub mod organizations;
pub mod projects;
pub mod requirement_coverage;
pub mod requirements;
pub mod test_case_versions;
pub mod test_cases;
pub mod test_plans;
pub mod test_results;
pub mod test_runs;
pub mod test_sections;
pub mod test_suites;
pub mod users;
