//! Authentication context injected into the API clients.
//!
//! The embedding application owns where credentials live (browser storage,
//! keychain, config file). The clients only ever ask this trait, so there is
//! a single place that reads the ambient login state instead of scattered
//! lookups in every component.

/// Source of the current user's credentials and login flags.
///
/// The access token is read on every call; there is no refresh logic in this
/// crate. A `None` token means the call goes out unauthenticated.
pub trait AuthContext: Send + Sync {
    /// Bearer token for the Authorization header, if the user is logged in.
    fn access_token(&self) -> Option<String>;

    /// Whether the logged-in user has a seller account.
    fn is_seller(&self) -> bool {
        false
    }

    /// Whether a user is currently logged in.
    fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Owned-value auth context for binaries and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    pub access_token: Option<String>,
    pub is_seller: bool,
}

impl StaticAuth {
    /// Context for a logged-in customer with the given token.
    pub fn logged_in(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            is_seller: false,
        }
    }

    /// Context with no credentials at all.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AuthContext for StaticAuth {
    fn access_token(&self) -> Option<String> {
        self.access_token.clone()
    }

    fn is_seller(&self) -> bool {
        self.is_seller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_auth_flags() {
        let auth = StaticAuth::logged_in("tok");
        assert!(auth.is_logged_in());
        assert!(!auth.is_seller());
        assert_eq!(auth.access_token().as_deref(), Some("tok"));

        let anon = StaticAuth::anonymous();
        assert!(!anon.is_logged_in());
        assert_eq!(anon.access_token(), None);
    }
}
