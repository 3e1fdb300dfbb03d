#![allow(dead_code)]

use std::time::SystemTime;

use backend::auth::jwt::{mint_token_pair, TokenPair};
use backend::entities::users::UserRole;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use sea_orm::DatabaseConnection;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::test_logging::init();
}

pub const TEST_JWT_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

/// App state with a disconnected database, for tests that never touch
/// the DB (middleware, extractors, proxy wiring).
pub fn state_without_db() -> AppState {
    AppState::new(
        DatabaseConnection::default(),
        SecurityConfig::new(TEST_JWT_SECRET),
    )
}

pub fn mint_tokens(user_id: i64, org_id: i64, role: UserRole) -> TokenPair {
    mint_token_pair(
        user_id,
        "tester@example.test",
        org_id,
        role,
        SystemTime::now(),
        &SecurityConfig::new(TEST_JWT_SECRET),
    )
    .expect("mint test token pair")
}
