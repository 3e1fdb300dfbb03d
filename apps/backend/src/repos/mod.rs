//! Data access layer. Free functions generic over `ConnectionTrait` so
//! they run on either a pooled connection or a transaction.

pub mod attachments;
pub mod cases;
pub mod milestones;
pub mod organizations;
pub mod plans;
pub mod projects;
pub mod requirements;
pub mod runs;
pub mod suites;
pub mod users;
