use crate::features::auth::{state::AuthStore, storage::KeyValueStore};
use crate::routes::{HOME_PATH, LOGIN_PATH, Route, RouteMeta};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Pre-navigation hook: refreshes the auth flag from storage, then applies
/// the route's metadata.
pub fn before_each<S: KeyValueStore>(auth: &AuthStore<S>, to: &Route) -> GuardDecision {
    let authenticated = auth.check_auth();
    let decision = evaluate(to.meta, authenticated);
    debug!(route = to.name, authenticated, ?decision, "navigation guard");
    decision
}

/// UX-only guard; the mock API itself performs no access control.
#[must_use]
pub fn evaluate(meta: RouteMeta, authenticated: bool) -> GuardDecision {
    if meta.requires_auth && !authenticated {
        GuardDecision::Redirect(LOGIN_PATH)
    } else if meta.requires_guest && authenticated {
        GuardDecision::Redirect(HOME_PATH)
    } else {
        GuardDecision::Proceed
    }
}
