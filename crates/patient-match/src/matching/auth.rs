use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

pub const INVALID_ACCESS_TOKEN: &str =
    "Invalid access token. Make sure to use Authorization: Bearer (token)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{}", INVALID_ACCESS_TOKEN)]
    MissingCredential,
    #[error("{}", INVALID_ACCESS_TOKEN)]
    InvalidCredential,
}

/// Bearer-token gate in front of the match operation.
#[derive(Debug, Clone, Default)]
pub struct AccessTokenValidator {
    tokens: Vec<String>,
}

impl AccessTokenValidator {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.access_tokens.clone())
    }

    /// No configured tokens means every request passes.
    pub fn is_enforcing(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Check the raw `Authorization` header value.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<(), AuthError> {
        if !self.is_enforcing() {
            return Ok(());
        }

        let presented = authorization
            .and_then(|value| value.trim().strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let matched = self.tokens.iter().fold(false, |found, token| {
            found | bool::from(token.as_bytes().ct_eq(presented.as_bytes()))
        });

        if matched {
            Ok(())
        } else {
            Err(AuthError::InvalidCredential)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> AccessTokenValidator {
        AccessTokenValidator::new(vec!["alpha-token".to_string(), "beta-token".to_string()])
    }

    #[test]
    fn accepts_any_configured_bearer_token() {
        assert_eq!(validator().authorize(Some("Bearer beta-token")), Ok(()));
    }

    #[test]
    fn rejects_unknown_or_missing_tokens() {
        let validator = validator();
        assert_eq!(
            validator.authorize(Some("Bearer gamma-token")),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(
            validator.authorize(Some("Basic alpha-token")),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(validator.authorize(None), Err(AuthError::MissingCredential));
    }

    #[test]
    fn empty_token_set_disables_the_gate() {
        let validator = AccessTokenValidator::default();
        assert!(!validator.is_enforcing());
        assert_eq!(validator.authorize(None), Ok(()));
    }
}
