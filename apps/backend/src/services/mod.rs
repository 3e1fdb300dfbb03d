//! Business logic. Thin CRUD lives in the route handlers over `repos`;
//! the modules here hold the flows with real rules in them.

pub mod ai;
pub mod attachments;
pub mod auth;
pub mod cases;
pub mod reports;
pub mod requirements;
pub mod runs;
pub mod stats;
pub mod validation;
