//! Protected-route decision over an external auth context.
//!
//! # Invariants
//! - A loading auth context never redirects; the user may still appear.
//! - Only a present user grants access.

use crate::config::DEFAULT_LOGIN_PATH;

/// Read-only view of the application's authentication state.
pub trait AuthContext {
    type User;

    fn user(&self) -> Option<&Self::User>;
    fn is_loading(&self) -> bool;
}

/// Plain `{user, isLoading}` value implementing [`AuthContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot<U> {
    pub user: Option<U>,
    pub is_loading: bool,
}

impl<U> AuthSnapshot<U> {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    pub fn signed_in(user: U) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_loading: false,
        }
    }
}

impl<U> AuthContext for AuthSnapshot<U> {
    type User = U;

    fn user(&self) -> Option<&U> {
        self.user.as_ref()
    }

    fn is_loading(&self) -> bool {
        self.is_loading
    }
}

/// What a protected route should do for the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Auth state still resolving; show a placeholder.
    Pending,
    /// Render the protected content.
    Allow,
    /// Replace the current location with `to`, remembering `from`.
    Redirect { to: String, from: String },
}

/// Guards routes that require a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decides how to handle a visit to `requested_path`.
    pub fn evaluate<A: AuthContext>(&self, auth: &A, requested_path: &str) -> RouteDecision {
        if auth.is_loading() {
            return RouteDecision::Pending;
        }
        if auth.user().is_some() {
            return RouteDecision::Allow;
        }
        RouteDecision::Redirect {
            to: self.login_path.clone(),
            from: requested_path.to_string(),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthContext, AuthSnapshot, RouteDecision, RouteGuard};

    #[test]
    fn loading_state_is_pending_even_with_stale_user() {
        let guard = RouteGuard::default();
        let auth = AuthSnapshot {
            user: Some("ana"),
            is_loading: true,
        };
        assert_eq!(guard.evaluate(&auth, "/feed"), RouteDecision::Pending);
        assert_eq!(
            guard.evaluate(&AuthSnapshot::<&str>::loading(), "/feed"),
            RouteDecision::Pending
        );
    }

    #[test]
    fn signed_in_user_is_allowed() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate(&AuthSnapshot::signed_in(42_u64), "/settings"),
            RouteDecision::Allow
        );
    }

    #[test]
    fn signed_out_visitor_is_redirected_to_login() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate(&AuthSnapshot::<u64>::signed_out(), "/settings"),
            RouteDecision::Redirect {
                to: "/login".to_string(),
                from: "/settings".to_string(),
            }
        );
    }

    #[test]
    fn custom_login_path_is_used() {
        let guard = RouteGuard::new("/auth/sign-in");
        assert_eq!(guard.login_path(), "/auth/sign-in");
        assert!(matches!(
            guard.evaluate(&AuthSnapshot::<()>::signed_out(), "/"),
            RouteDecision::Redirect { to, .. } if to == "/auth/sign-in"
        ));
    }

    struct SessionCookie {
        account: Option<String>,
    }

    impl AuthContext for SessionCookie {
        type User = String;

        fn user(&self) -> Option<&String> {
            self.account.as_ref()
        }

        fn is_loading(&self) -> bool {
            false
        }
    }

    #[test]
    fn works_with_any_auth_context() {
        let guard = RouteGuard::default();
        let session = SessionCookie {
            account: Some("creator".to_string()),
        };
        assert_eq!(guard.evaluate(&session, "/upload"), RouteDecision::Allow);
    }
}
