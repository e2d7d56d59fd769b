use crate::{
    app::AppContext,
    cli::actions::render,
    features::auth::KeyValueStore,
    routes::{HOME_PATH, LOGIN_PATH},
};
use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{info, warn};

#[derive(Debug)]
pub struct LoginArgs {
    pub username: String,
    pub password: SecretString,
}

/// Login page flow: enter `/login` (guest-only), look the user up, persist
/// the marker on a match and move on to `/`.
/// # Errors
/// Returns an error if the lookup fails or the credentials do not match.
pub async fn login<S: KeyValueStore>(ctx: &AppContext<S>, args: &LoginArgs) -> Result<Value> {
    let mut router = ctx.router();

    let nav = router.navigate(LOGIN_PATH)?;
    if nav.route.path != LOGIN_PATH {
        info!("Session already authenticated");
        return Ok(json!({
            "status": "already authenticated",
            "route": nav.route.path,
        }));
    }

    let Some(user) = ctx
        .users
        .login(&args.username, args.password.expose_secret())
        .await?
    else {
        warn!(username = %args.username, "Invalid credentials");
        bail!("Invalid username or password");
    };

    ctx.auth.login();
    let nav = router.navigate(HOME_PATH)?;
    if !ctx.auth.is_authenticated() {
        bail!("Signed in as {}, but the session could not be saved", user.username);
    }
    info!(username = %user.username, "Signed in");

    Ok(json!({
        "status": "authenticated",
        "user": render::user_summary(&user),
        "route": nav.route.path,
    }))
}

pub fn logout<S: KeyValueStore>(ctx: &AppContext<S>) -> Value {
    ctx.auth.logout();
    info!("Signed out");
    json!({ "status": "signed out" })
}

pub fn status<S: KeyValueStore>(ctx: &AppContext<S>) -> Value {
    json!({ "authenticated": ctx.auth.check_auth() })
}
