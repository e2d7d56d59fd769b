use crate::{
    app::AppContext,
    cli::{
        actions::{Action, open, prisoners, session, users},
        globals::GlobalArgs,
    },
    features::auth::KeyValueStore,
};
use anyhow::Result;
use serde_json::Value;
use tracing::debug;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a matching arm in `dispatch`.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    debug!(config = ?globals.config, "starting action");
    let ctx = AppContext::from_config(&globals.config)?;
    let output = dispatch(action, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(super) async fn dispatch<S: KeyValueStore>(action: Action, ctx: &AppContext<S>) -> Result<Value> {
    match action {
        Action::Login(args) => session::login(ctx, &args).await,
        Action::Logout => Ok(session::logout(ctx)),
        Action::Status => Ok(session::status(ctx)),
        Action::Open { path } => open::execute(ctx, &path).await,
        Action::Prisoners(command) => prisoners::execute(ctx, command).await,
        Action::Users(command) => users::execute(ctx, command).await,
    }
}
