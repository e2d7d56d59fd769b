//! Route table and router. Every navigation runs the auth guard first, the
//! same way a client-side router's `beforeEach` hook would, and follows any
//! redirect it asks for as a fresh navigation.

use crate::errors::AppError;
use crate::features::auth::{
    guards::{GuardDecision, before_each},
    state::AuthStore,
    storage::KeyValueStore,
};
use tracing::info;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PATH: &str = "/admin";

/// Redirect targets are public or guest-only, so chains stop after one hop;
/// the bound only protects against a misconfigured table.
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Login,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

pub static ROUTES: [Route; 3] = [
    Route {
        path: HOME_PATH,
        name: "Home",
        view: View::Home,
        meta: RouteMeta {
            requires_auth: false,
            requires_guest: false,
        },
    },
    Route {
        path: LOGIN_PATH,
        name: "Login",
        view: View::Login,
        meta: RouteMeta {
            requires_auth: false,
            requires_guest: true,
        },
    },
    Route {
        path: ADMIN_PATH,
        name: "Admin",
        view: View::Admin,
        meta: RouteMeta {
            requires_auth: true,
            requires_guest: false,
        },
    },
];

/// Looks a path up in the route table.
///
/// # Errors
/// Returns `AppError::RouteNotFound` when no route matches.
pub fn resolve(path: &str) -> Result<&'static Route, AppError> {
    let normalized = normalize_path(path);
    ROUTES
        .iter()
        .find(|route| route.path == normalized)
        .ok_or_else(|| AppError::RouteNotFound(path.trim().to_string()))
}

/// Drops query, fragment and trailing slashes; `""` becomes `/`.
fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub route: &'static Route,
    pub redirected: bool,
}

pub struct Router<'a, S> {
    auth: &'a AuthStore<S>,
    current: Option<&'static Route>,
}

impl<'a, S: KeyValueStore> Router<'a, S> {
    pub fn new(auth: &'a AuthStore<S>) -> Self {
        Self {
            auth,
            current: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&'static Route> {
        self.current
    }

    /// Navigates to `path`, letting the guard redirect first.
    ///
    /// # Errors
    /// Returns `AppError::RouteNotFound` for unknown paths and
    /// `AppError::Config` if redirects do not settle.
    pub fn navigate(&mut self, path: &str) -> Result<Navigation, AppError> {
        let mut route = resolve(path)?;
        let mut redirects = 0;

        while let GuardDecision::Redirect(target) = before_each(self.auth, route) {
            redirects += 1;
            if redirects > MAX_REDIRECTS {
                return Err(AppError::Config(format!(
                    "Too many redirects while navigating to {path}"
                )));
            }
            info!(from = route.path, to = target, "navigation redirected");
            route = resolve(target)?;
        }

        self.current = Some(route);

        Ok(Navigation {
            requested: path.trim().to_string(),
            route,
            redirected: redirects > 0,
        })
    }
}
