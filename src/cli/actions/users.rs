use crate::{
    app::AppContext,
    cli::actions::render,
    features::{auth::KeyValueStore, users::User},
    routes::ADMIN_PATH,
};
use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::info;

#[derive(Debug)]
pub enum UserCommand {
    List,
    Add {
        username: String,
        password: SecretString,
    },
    Update {
        id: String,
        username: Option<String>,
        password: Option<SecretString>,
    },
    Delete {
        id: String,
    },
}

/// User management lives on the auth-only admin route; a redirect from the
/// guard means there is no session.
/// # Errors
/// Returns an error when not signed in or if the API call fails.
pub async fn execute<S: KeyValueStore>(ctx: &AppContext<S>, command: UserCommand) -> Result<Value> {
    let nav = ctx.router().navigate(ADMIN_PATH)?;
    if nav.redirected {
        bail!("authentication required: sign in with `cellblock login` first");
    }

    let output = match command {
        UserCommand::List => {
            let users = ctx.users.find_all().await?;
            Value::Array(users.iter().map(render::user_summary).collect())
        }
        UserCommand::Add { username, password } => {
            let created = ctx
                .users
                .save(&User::new(username, password.expose_secret()))
                .await?;
            info!(id = ?created.id, "User created");
            render::user_summary(&created)
        }
        UserCommand::Update {
            id,
            username,
            password,
        } => {
            let mut user = ctx.users.find_by_id(&id).await?;
            user.id = None;
            if let Some(username) = username {
                user.username = username;
            }
            if let Some(password) = password {
                user.password = password.expose_secret().to_string();
            }
            let updated = ctx.users.update(&id, &user).await?;
            info!(id = %id, "User updated");
            render::user_summary(&updated)
        }
        UserCommand::Delete { id } => {
            let confirmation: Value = ctx.users.delete_by_id(&id).await?;
            info!(id = %id, "User deleted");
            // The confirmation echoes the deleted record, password included.
            match serde_json::from_value::<User>(confirmation.clone()) {
                Ok(user) if confirmation.is_object() => render::user_summary(&user),
                _ => confirmation,
            }
        }
    };

    Ok(output)
}
