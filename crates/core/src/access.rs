//! Route gating based on session and onboarding state.

use serde::{Deserialize, Serialize};

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: [&str; 3] = ["/", "/login", "/register"];

const UNGATED_PREFIXES: [&str; 3] = ["/api", "/_next/static", "/_next/image"];
const UNGATED_FILES: [&str; 3] = ["/favicon.ico", "/manifest.json", "/robots.txt"];
const STATIC_EXTENSIONS: [&str; 7] = ["svg", "png", "jpg", "jpeg", "gif", "webp", "ico"];

/// What to do with an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Serve the requested path.
    Allow,
    /// Send the user elsewhere.
    Redirect {
        /// Target path, including any query string
        location: String,
    },
}

impl RouteDecision {
    fn redirect(location: impl Into<String>) -> Self {
        RouteDecision::Redirect { location: location.into() }
    }
}

/// Whether the gate applies to `path` at all.
///
/// API routes, framework assets and static files bypass it.
pub fn is_gated(path: &str) -> bool {
    if UNGATED_PREFIXES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
    {
        return false;
    }
    if UNGATED_FILES.contains(&path) {
        return false;
    }
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    !matches!(extension, Some(ext) if STATIC_EXTENSIONS.contains(&ext.as_str()))
}

/// Decide where a request for `path` goes.
///
/// `onboarding_completed` is `None` when the signed-in user has no profile
/// row yet; such users are let through.
pub fn decide_route(path: &str, signed_in: bool, onboarding_completed: Option<bool>) -> RouteDecision {
    if !is_gated(path) {
        return RouteDecision::Allow;
    }

    let is_public = PUBLIC_ROUTES.contains(&path);

    if !signed_in {
        if is_public {
            return RouteDecision::Allow;
        }
        return RouteDecision::redirect(format!("/login?redirectTo={}", urlencoding::encode(path)));
    }

    if !is_public && path != "/onboarding" && onboarding_completed == Some(false) {
        return RouteDecision::redirect("/onboarding");
    }

    if path == "/login" || path == "/register" {
        return RouteDecision::redirect("/dashboard");
    }

    RouteDecision::Allow
}
