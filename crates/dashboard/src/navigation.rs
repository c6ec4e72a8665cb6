//! Routes and navigation.
//!
//! [`Route`] is the pure domain model: which screen, which path, whether it
//! needs a session. [`Navigator`] is the seam to whatever owns the history
//! (a browser, a console loop, a test double). [`History`] is the in-memory
//! implementation used by the console front-end and the tests.

use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use seller_panel_core::{ProductId, ProductStatus};
use tracing::debug;
use url::form_urlencoded;

/// Application screens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in screen, optionally pre-filled with an email (after sign-up).
    SignIn { email: Option<String> },
    /// Seller registration.
    SignUp,
    /// Metrics overview (home of the authenticated area).
    Dashboard,
    /// Seller's product list with its filters.
    Products {
        search: Option<String>,
        status: Option<ProductStatus>,
    },
    /// Product creation.
    NewProduct,
    /// Product editor.
    Product(ProductId),
    /// Anything else.
    NotFound,
}

impl Default for Route {
    fn default() -> Self {
        Self::sign_in()
    }
}

impl Route {
    /// Sign-in without a pre-filled email.
    #[must_use]
    pub const fn sign_in() -> Self {
        Self::SignIn { email: None }
    }

    /// Unfiltered product list.
    #[must_use]
    pub const fn products() -> Self {
        Self::Products {
            search: None,
            status: None,
        }
    }

    /// Parse a path, with an optional query string, into a route.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/sign-in" => Self::SignIn {
                email: query_param(query, "email"),
            },
            "/sign-up" => Self::SignUp,
            "/" => Self::Dashboard,
            "/products" => Self::Products {
                search: query_param(query, "search"),
                status: query_param(query, "status").and_then(|s| s.parse().ok()),
            },
            "/products/new" => Self::NewProduct,
            other => other
                .strip_prefix("/products/")
                .and_then(|id| id.parse::<ProductId>().ok())
                .map_or(Self::NotFound, Self::Product),
        }
    }

    /// Path for this route, including its query string.
    #[must_use]
    pub fn to_path(&self) -> String {
        match self {
            Self::SignIn { email } => with_query("/sign-in", &[("email", email.as_deref())]),
            Self::SignUp => "/sign-up".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Products { search, status } => with_query(
                "/products",
                &[
                    ("search", search.as_deref()),
                    ("status", status.as_ref().map(ProductStatus::as_str)),
                ],
            ),
            Self::NewProduct => "/products/new".to_string(),
            Self::Product(id) => format!("/products/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the screen needs a live session (and therefore the session
    /// guard).
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Products { .. } | Self::NewProduct | Self::Product(_)
        )
    }

    /// Where an expired session sends the seller.
    #[must_use]
    pub const fn auth_failure_redirect() -> Self {
        Self::sign_in()
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Add a new entry (normal flow).
    Push,
    /// Overwrite the current entry, so "back" cannot return to it.
    Replace,
}

/// Something that can move the seller between screens.
///
/// Implementations must make navigating to the current route harmless:
/// several failing requests may all ask for the same redirect.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, mode: NavigationMode);

    fn current(&self) -> Route;
}

/// In-memory history stack.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// History starting on the sign-in screen.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Route::sign_in())
    }

    /// History starting on a given screen.
    #[must_use]
    pub fn starting_at(route: Route) -> Self {
        Self {
            entries: Mutex::new(vec![route]),
        }
    }

    /// Go back one entry. Returns the route now shown, or `None` if there
    /// was nothing to go back to.
    pub fn back(&self) -> Option<Route> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }

    /// Snapshot of the stack, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route, mode: NavigationMode) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if entries.last() == Some(&route) {
            debug!(route = %route, "Already on route, ignoring navigation");
            return;
        }

        debug!(route = %route, ?mode, "Navigating");
        match mode {
            NavigationMode::Push => entries.push(route),
            NavigationMode::Replace => {
                entries.pop();
                entries.push(route);
            }
        }
    }

    fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }
}
