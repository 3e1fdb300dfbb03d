use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::jwt::Claims;
use crate::entities::users::UserRole;
use crate::error::AppError;

/// The authenticated caller, taken from the claims the `JwtExtract`
/// middleware stored in request extensions. Everything a handler needs
/// for tenancy scoping and role checks without a database round trip.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claims: Claims,
}

impl CurrentUser {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.claims.user_id()
    }

    pub fn org_id(&self) -> i64 {
        self.claims.org_id
    }

    pub fn role(&self) -> UserRole {
        self.claims.role
    }

    /// 403 unless the caller's role grants at least `required`.
    pub fn require(&self, required: UserRole) -> Result<(), AppError> {
        if self.claims.role.at_least(required) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Insufficient role for this operation",
            ))
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        ready(
            claims
                .map(|claims| CurrentUser { claims })
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CurrentUser;
    use crate::auth::jwt::{Claims, TokenKind};
    use crate::entities::users::UserRole;

    fn current_user(role: UserRole) -> CurrentUser {
        CurrentUser {
            claims: Claims {
                sub: "17".to_string(),
                email: "qa@example.test".to_string(),
                org_id: 3,
                role,
                kind: TokenKind::Access,
                iat: 0,
                exp: 0,
            },
        }
    }

    #[test]
    fn role_gate() {
        assert!(current_user(UserRole::Admin).require(UserRole::Manager).is_ok());
        assert!(current_user(UserRole::Viewer).require(UserRole::Tester).is_err());
        assert!(current_user(UserRole::Tester).require(UserRole::Tester).is_ok());
    }

    #[test]
    fn accessors() {
        let user = current_user(UserRole::Manager);
        assert_eq!(user.user_id().unwrap(), 17);
        assert_eq!(user.org_id(), 3);
        assert_eq!(user.role(), UserRole::Manager);
    }
}
