use crate::route::{DashboardPage, Requirement, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Reads the role stored in the identity provider's public metadata.
    pub fn from_metadata(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The identity provider has not answered yet.
    #[default]
    Loading,
    SignedOut,
    SignedIn { user_id: String, role: Role },
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            AuthState::SignedIn {
                role: Role::Admin,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Session state unknown; hold the navigation until it resolves.
    Wait,
    Redirect(Route),
}

/// Decides whether `route` may be shown for the current session.
pub fn gate(route: &Route, auth: &AuthState) -> Access {
    match (route.requirement(), auth) {
        (Requirement::Public, _) => Access::Allow,
        (_, AuthState::Loading) => Access::Wait,
        (_, AuthState::SignedOut) => Access::Redirect(Route::Login),
        (Requirement::SignedIn, AuthState::SignedIn { .. }) => Access::Allow,
        (Requirement::Admin, AuthState::SignedIn { role: Role::Admin, .. }) => Access::Allow,
        (Requirement::Admin, AuthState::SignedIn { .. }) => {
            Access::Redirect(Route::Dashboard(DashboardPage::Overview))
        }
    }
}
