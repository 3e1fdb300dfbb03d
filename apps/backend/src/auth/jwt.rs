use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::entities::users::UserRole;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Access tokens live 15 minutes, refresh tokens 7 days.
const ACCESS_TTL_SECS: i64 = 15 * 60;
const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Distinguishes access tokens from refresh tokens so one cannot be
/// presented in place of the other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims included in backend-issued tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, stringified per JWT convention.
    pub sub: String,
    pub email: String,
    /// Tenant boundary: every query is scoped to this organization.
    pub org_id: i64,
    pub role: UserRole,
    pub kind: TokenKind,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::unauthorized_invalid_jwt())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mint an access + refresh token pair for the given user.
pub fn mint_token_pair(
    user_id: i64,
    email: &str,
    org_id: i64,
    role: UserRole,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<TokenPair, AppError> {
    let access_token = mint_token(
        user_id,
        email,
        org_id,
        role,
        TokenKind::Access,
        ACCESS_TTL_SECS,
        now,
        security,
    )?;
    let refresh_token = mint_token(
        user_id,
        email,
        org_id,
        role,
        TokenKind::Refresh,
        REFRESH_TTL_SECS,
        now,
        security,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

#[allow(clippy::too_many_arguments)]
fn mint_token(
    user_id: i64,
    email: &str,
    org_id: i64,
    role: UserRole,
    kind: TokenKind,
    ttl_secs: i64,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        org_id,
        role,
        kind,
        iat,
        exp: iat + ttl_secs,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify an access token and return its claims.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenKind::Access, security)
}

/// Verify a refresh token and return its claims.
pub fn verify_refresh_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenKind::Refresh, security)
}

fn verify_token(
    token: &str,
    expected_kind: TokenKind,
    security: &SecurityConfig,
) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured one.
    let validation = Validation::new(security.algorithm);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })?;

    if claims.kind != expected_kind {
        return Err(AppError::unauthorized(
            crate::errors::ErrorCode::UnauthorizedWrongTokenKind,
            "Wrong token kind for this operation",
        ));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::{mint_token_pair, verify_access_token, verify_refresh_token};
    use crate::entities::users::UserRole;
    use crate::errors::ErrorCode;
    use crate::state::security_config::SecurityConfig;
    use crate::AppError;

    fn security() -> SecurityConfig {
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }

    #[test]
    fn mint_and_verify_roundtrip() {
        let security = security();
        let pair = mint_token_pair(
            42,
            "tester@example.test",
            7,
            UserRole::Tester,
            SystemTime::now(),
            &security,
        )
        .unwrap();

        let claims = verify_access_token(&pair.access_token, &security).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "tester@example.test");
        assert_eq!(claims.org_id, 7);
        assert_eq!(claims.role, UserRole::Tester);
        assert_eq!(claims.exp, claims.iat + 15 * 60);

        let refresh = verify_refresh_token(&pair.refresh_token, &security).unwrap();
        assert_eq!(refresh.exp, refresh.iat + 7 * 24 * 60 * 60);
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let security = security();
        let pair = mint_token_pair(
            1,
            "a@example.test",
            1,
            UserRole::Admin,
            SystemTime::now(),
            &security,
        )
        .unwrap();

        match verify_refresh_token(&pair.access_token, &security) {
            Err(AppError::Unauthorized { code, .. }) => {
                assert_eq!(code, ErrorCode::UnauthorizedWrongTokenKind);
            }
            other => panic!("expected wrong-kind error, got {other:?}"),
        }

        match verify_access_token(&pair.refresh_token, &security) {
            Err(AppError::Unauthorized { code, .. }) => {
                assert_eq!(code, ErrorCode::UnauthorizedWrongTokenKind);
            }
            other => panic!("expected wrong-kind error, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_rejected() {
        let security = security();
        let past = SystemTime::now() - Duration::from_secs(20 * 60);
        let pair = mint_token_pair(
            1,
            "a@example.test",
            1,
            UserRole::Viewer,
            past,
            &security,
        )
        .unwrap();

        match verify_access_token(&pair.access_token, &security) {
            Err(AppError::Unauthorized { code, .. }) => {
                assert_eq!(code, ErrorCode::UnauthorizedExpiredJwt);
            }
            other => panic!("expected expired error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_secret_rejected() {
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let security_b = SecurityConfig::new("secret-B".as_bytes());
        let pair = mint_token_pair(
            1,
            "a@example.test",
            1,
            UserRole::Manager,
            SystemTime::now(),
            &security_a,
        )
        .unwrap();

        match verify_access_token(&pair.access_token, &security_b) {
            Err(AppError::Unauthorized { code, .. }) => {
                assert_eq!(code, ErrorCode::UnauthorizedInvalidJwt);
            }
            other => panic!("expected invalid error, got {other:?}"),
        }
    }
}
