use clap::ValueEnum;
use serde::Serialize;

use crate::source::DataSource;
use crate::ui::{Icon, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

/// Opaque signed-in session. The view layer only cares whether one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: String,
}

/// Process-wide context handed to every page: theme, session and the data
/// source standing in for the shared fetch cache. Built once at startup.
pub struct Providers {
    theme: ThemeMode,
    session: Option<Session>,
    data: Box<dyn DataSource>,
}

impl Providers {
    pub fn new(theme: ThemeMode, session: Option<Session>, data: Box<dyn DataSource>) -> Self {
        Self { theme, session, data }
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn data(&self) -> &dyn DataSource {
        self.data.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Github,
}

impl AuthProvider {
    pub const ALL: [AuthProvider; 2] = [AuthProvider::Google, AuthProvider::Github];

    pub fn id(self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Github => "github",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthProvider::Google => "Continue with Google",
            AuthProvider::Github => "Continue with GitHub",
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            AuthProvider::Google => Icon::Mail,
            AuthProvider::Github => Icon::Github,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The provider accepted the login and sent the user to the callback.
    Redirected(Route),
    /// Failed or cancelled. No error details are passed back.
    Declined,
}

/// Federated login service. Everything past the button press belongs to it.
pub trait IdentityProvider {
    fn sign_in(&self, provider: AuthProvider, callback: Route) -> SignInOutcome;
}

/// Stands in for the federated service on the command line: a configured
/// session user counts as a completed login, anything else as declined.
pub struct SessionIdentity<'a> {
    session: Option<&'a Session>,
}

impl<'a> SessionIdentity<'a> {
    pub fn new(session: Option<&'a Session>) -> Self {
        Self { session }
    }
}

impl IdentityProvider for SessionIdentity<'_> {
    fn sign_in(&self, provider: AuthProvider, callback: Route) -> SignInOutcome {
        match self.session {
            Some(session) => {
                tracing::info!(provider = provider.id(), user = %session.user, "signed in");
                SignInOutcome::Redirected(callback)
            }
            None => SignInOutcome::Declined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_identity_redirects_only_with_a_session() {
        let session = Session {
            user: "avery".to_string(),
        };
        let signed_in = SessionIdentity::new(Some(&session));
        assert_eq!(
            signed_in.sign_in(AuthProvider::Google, Route::Dashboard),
            SignInOutcome::Redirected(Route::Dashboard)
        );

        let signed_out = SessionIdentity::new(None);
        assert_eq!(
            signed_out.sign_in(AuthProvider::Github, Route::Dashboard),
            SignInOutcome::Declined
        );
    }
}
