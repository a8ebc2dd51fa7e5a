//! Which screen a location opens.
//!
//! Pure functions over an explicit location string and session flag, so the
//! decision can be tested without a terminal or a browser. A location is a
//! path with an optional query (`/?auth=login`, `/dashboard`), optionally
//! prefixed by `scheme://host`.

use std::fmt;

/// Path of the dashboard screen.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Tab of the combined sign-up / sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Register,
    Login,
}

impl AuthTab {
    /// Tab requested by the `auth` query parameter.
    ///
    /// `auth=login` and `auth=register` select their tab; a missing,
    /// unknown, or unparsable parameter yields the default (`Register`).
    /// The last `auth` parameter wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == "auth")
            .filter_map(|(_, value)| match value {
                "login" => Some(Self::Login),
                "register" => Some(Self::Register),
                _ => None,
            })
            .last()
            .unwrap_or_default()
    }

    /// The other tab.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Register => Self::Login,
            Self::Login => Self::Register,
        }
    }
}

impl fmt::Display for AuthTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("Sign Up"),
            Self::Login => f.write_str("Sign In"),
        }
    }
}

/// A top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing { tab: AuthTab },
    Dashboard,
}

impl View {
    /// Resolve `location` to a screen.
    ///
    /// The dashboard requires a session; without one it redirects to the
    /// login tab. Every other path is the landing page.
    #[must_use]
    pub fn resolve(location: &str, has_session: bool) -> Self {
        let (path, query) = split_location(location);
        if path.trim_end_matches('/') == DASHBOARD_PATH {
            return if has_session {
                Self::Dashboard
            } else {
                Self::Landing {
                    tab: AuthTab::Login,
                }
            };
        }
        Self::Landing {
            tab: AuthTab::from_query(query),
        }
    }
}

/// Split into `(path, query)`, dropping any `scheme://host` prefix and
/// `#fragment`.
fn split_location(location: &str) -> (&str, &str) {
    let location = location.trim();
    let location = location.split_once('#').map_or(location, |(l, _)| l);
    let location = match location.split_once("://") {
        Some((_, rest)) => rest.find(['/', '?']).map_or("", |i| &rest[i..]),
        None => location,
    };
    let (path, query) = location.split_once('?').unwrap_or((location, ""));
    (if path.is_empty() { "/" } else { path }, query)
}
