//! Registration, login and token refresh.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::auth::jwt::{mint_token_pair, verify_refresh_token, Claims, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::entities::users::{self, UserRole};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos;
use crate::services::validation;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub organization_name: String,
    pub organization_slug: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Bootstrap a new organization with its first ADMIN user.
pub async fn register<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    input: RegisterInput,
) -> Result<(users::Model, TokenPair), AppError> {
    validation::require_non_empty("organization_name", &input.organization_name)?;
    validation::require_non_empty("display_name", &input.display_name)?;
    validation::validate_slug(&input.organization_slug)?;
    validation::validate_email(&input.email)?;
    validation::validate_password(&input.password)?;

    let org =
        repos::organizations::create(conn, &input.organization_name, &input.organization_slug)
            .await?;

    let password_hash = hash_password(&input.password)?;
    let user = repos::users::create(
        conn,
        org.id,
        &input.email,
        &password_hash,
        &input.display_name,
        UserRole::Admin,
    )
    .await?;

    let tokens = mint_token_pair(
        user.id,
        &user.email,
        user.org_id,
        user.role,
        SystemTime::now(),
        security,
    )?;
    Ok((user, tokens))
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    email: &str,
    password: &str,
) -> Result<(users::Model, TokenPair), AppError> {
    let user = repos::users::find_by_email(conn, email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    let tokens = mint_token_pair(
        user.id,
        &user.email,
        user.org_id,
        user.role,
        SystemTime::now(),
        security,
    )?;
    Ok((user, tokens))
}

/// Exchange a refresh token for a fresh token pair.
pub fn refresh(security: &SecurityConfig, refresh_token: &str) -> Result<TokenPair, AppError> {
    let claims = verify_refresh_token(refresh_token, security)?;
    mint_token_pair(
        claims.user_id()?,
        &claims.email,
        claims.org_id,
        claims.role,
        SystemTime::now(),
        security,
    )
}

pub async fn current_user<C: ConnectionTrait>(
    conn: &C,
    claims: &Claims,
) -> Result<users::Model, AppError> {
    repos::users::find_in_org(conn, claims.org_id, claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User no longer exists"))
}
