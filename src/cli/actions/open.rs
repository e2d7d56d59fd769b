use crate::{app::AppContext, cli::actions::render, features::auth::KeyValueStore, routes::View};
use anyhow::Result;
use serde_json::{Value, json};

const LOGIN_HINT: &str = "cellblock login --username <USERNAME> --password <PASSWORD>";

/// Navigates through the guard and renders wherever it lands.
/// # Errors
/// Returns an error for unknown routes or if the view's data cannot be fetched.
pub async fn execute<S: KeyValueStore>(ctx: &AppContext<S>, path: &str) -> Result<Value> {
    let nav = ctx.router().navigate(path)?;
    let data = render_view(ctx, nav.route.view).await?;
    Ok(render::navigation(&nav, data))
}

async fn render_view<S: KeyValueStore>(ctx: &AppContext<S>, view: View) -> Result<Value> {
    match view {
        View::Home => Ok(serde_json::to_value(ctx.prisoners.find_all().await?)?),
        View::Login => Ok(json!({ "hint": LOGIN_HINT })),
        View::Admin => {
            let users = ctx.users.find_all().await?;
            Ok(Value::Array(users.iter().map(render::user_summary).collect()))
        }
    }
}
