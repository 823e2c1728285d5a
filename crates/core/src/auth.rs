//! Shared-secret caller authorization.

use subtle::ConstantTimeEq;

use crate::Error;

/// Checks caller credentials against the process-wide configured secret.
///
/// With no secret configured every credential is rejected.
#[derive(Clone)]
pub struct Authorizer {
    secret: Option<String>,
}

impl Authorizer {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()) }
    }

    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if the credential is missing or does not match.
    pub fn check(&self, credential: Option<&str>) -> Result<(), Error> {
        let (Some(secret), Some(credential)) = (self.secret.as_deref(), credential) else {
            return Err(Error::Unauthorized);
        };
        if secret.as_bytes().ct_eq(credential.as_bytes()).unwrap_u8() == 1 {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").field("configured", &self.secret.is_some()).finish()
    }
}
