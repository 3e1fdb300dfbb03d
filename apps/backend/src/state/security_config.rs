use jsonwebtoken::Algorithm;

/// JWT signing configuration shared across the application.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            jwt_secret: jwt_secret.to_vec(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Random secret for tests so suites cannot accidentally verify each
    /// other's tokens.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let secret = uuid::Uuid::new_v4().to_string();
        Self::new(secret.as_bytes())
    }
}
