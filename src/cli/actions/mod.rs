pub mod open;
pub mod prisoners;
pub mod session;
pub mod users;

mod render;

// Internal "interpreter" for `Action`.
// The match lives in a separate module so `mod.rs` stays small as actions are added.
mod run;

use crate::{app::AppContext, cli::globals::GlobalArgs, features::auth::KeyValueStore};
use serde_json::Value;

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Logout,
    Status,
    Open { path: String },
    Prisoners(prisoners::PrisonerCommand),
    Users(users::UserCommand),
}

impl Action {
    /// Builds the file-backed context, runs the action and prints its output.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }

    /// Runs the action against an existing context and returns its output.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn run<S: KeyValueStore>(self, ctx: &AppContext<S>) -> anyhow::Result<Value> {
        run::dispatch(self, ctx).await
    }
}
