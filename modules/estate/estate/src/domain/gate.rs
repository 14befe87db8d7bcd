//! Route gate and page guard.
//!
//! The gate is a coarse fast path: it lets public pages through and bounces
//! signed-in users off the login flow. Whether a role owns a page is decided
//! by [`PageGuard`], which every role-scoped handler re-checks on its own.

use estate_security::{Role, default_route};

use super::session::SessionState;

/// Public pages, reachable by anyone.
pub const PUBLIC_PAGES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
];

/// Pages that start the authentication flow.
pub const AUTH_ENTRY_PAGES: &[&str] = &["/login", "/register"];

/// Prefix of the public JSON API.
pub const PUBLIC_API_PREFIX: &str = "/api/public";

/// Where page-guard denials send the visitor.
pub const DENIED_REDIRECT: &str = "/";

/// Outcome of the coarse route gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectTo(&'static str),
    /// Defer to the page-level guard.
    Continue,
}

/// Outcome of the page-level guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageDecision {
    Render,
    /// Session still resolving; show a neutral placeholder, never a denial.
    Loading,
    Deny { redirect_to: &'static str },
}

/// Route matcher for the public set.
#[derive(Clone)]
pub struct PublicRouteMatcher {
    matcher: matchit::Router<()>,
}

impl PublicRouteMatcher {
    fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
        }
    }

    fn insert(&mut self, path: &str) -> Result<(), matchit::InsertError> {
        self.matcher.insert(path, ())
    }

    fn find(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// Coarse route gate over the public set and the auth-entry pages.
#[derive(Clone)]
pub struct AccessGate {
    public: PublicRouteMatcher,
}

impl AccessGate {
    /// Build the gate for the standard route surface.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in pattern is rejected by the matcher.
    pub fn new() -> Result<Self, matchit::InsertError> {
        let mut public = PublicRouteMatcher::new();
        for page in PUBLIC_PAGES {
            public.insert(page)?;
        }
        public.insert(PUBLIC_API_PREFIX)?;
        public.insert(&format!("{PUBLIC_API_PREFIX}/{{*rest}}"))?;
        Ok(Self { public })
    }

    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public.find(path)
    }

    /// Decide what to do with a request before any page logic runs.
    ///
    /// An authenticated principal hitting an auth-entry page is redirected to
    /// its landing route even though those pages are public; everyone else
    /// gets the public pages as-is.
    #[must_use]
    pub fn authorize(&self, path: &str, session: &SessionState) -> GateDecision {
        if let SessionState::Authenticated(principal) = session
            && AUTH_ENTRY_PAGES.contains(&path)
        {
            return GateDecision::RedirectTo(default_route(Some(principal.role())));
        }
        if self.is_public(path) {
            return GateDecision::Allow;
        }
        GateDecision::Continue
    }
}

/// Allow-list of roles declared by a page.
///
/// `SuperAdmin` is granted every page regardless of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGuard {
    required_roles: &'static [Role],
}

impl PageGuard {
    #[must_use]
    pub const fn new(required_roles: &'static [Role]) -> Self {
        Self { required_roles }
    }

    /// Guard of a role-scoped page: only the owning role is listed.
    #[must_use]
    pub const fn owned_by(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Self::new(&[Role::SuperAdmin]),
            Role::ColonyAdmin => Self::new(&[Role::ColonyAdmin]),
            Role::BlockManager => Self::new(&[Role::BlockManager]),
            Role::Resident => Self::new(&[Role::Resident]),
        }
    }

    /// Guard for a path under one of the role prefixes, if it is one.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        Role::owning_path(path).map(Self::owned_by)
    }

    #[must_use]
    pub fn required_roles(&self) -> &'static [Role] {
        self.required_roles
    }

    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        role == Role::SuperAdmin || self.required_roles.contains(&role)
    }

    #[must_use]
    pub fn check(&self, session: &SessionState) -> PageDecision {
        match session {
            SessionState::Authenticating => PageDecision::Loading,
            SessionState::Authenticated(principal) if self.admits(principal.role()) => {
                PageDecision::Render
            }
            SessionState::Authenticated(principal) => {
                tracing::debug!(role = %principal.role(), "Page guard denied role");
                PageDecision::Deny {
                    redirect_to: DENIED_REDIRECT,
                }
            }
            SessionState::Anonymous => PageDecision::Deny {
                redirect_to: DENIED_REDIRECT,
            },
        }
    }
}
