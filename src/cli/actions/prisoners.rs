use crate::{
    app::AppContext,
    features::{auth::KeyValueStore, prisoners::Prisoner},
    routes::HOME_PATH,
};
use anyhow::{Result, bail};
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug)]
pub enum PrisonerCommand {
    List,
    Get { id: String },
    Add { fields: Map<String, Value> },
    Update { id: String, fields: Map<String, Value> },
    Delete { id: String },
}

/// Prisoner management lives on the public home route.
/// # Errors
/// Returns an error if the API call fails.
pub async fn execute<S: KeyValueStore>(
    ctx: &AppContext<S>,
    command: PrisonerCommand,
) -> Result<Value> {
    ctx.router().navigate(HOME_PATH)?;

    let output = match command {
        PrisonerCommand::List => serde_json::to_value(ctx.prisoners.find_all().await?)?,
        PrisonerCommand::Get { id } => serde_json::to_value(ctx.prisoners.find_by_id(&id).await?)?,
        PrisonerCommand::Add { fields } => {
            let created = ctx.prisoners.save(&Prisoner::new(fields)).await?;
            info!(id = ?created.id, "Prisoner created");
            serde_json::to_value(created)?
        }
        PrisonerCommand::Update { id, fields } => {
            let mut record = ctx.prisoners.find_by_id(&id).await?;
            record.fields.extend(fields);
            let updated = ctx.prisoners.update(&id, &record.without_id()).await?;
            info!(id = %id, "Prisoner updated");
            serde_json::to_value(updated)?
        }
        PrisonerCommand::Delete { id } => {
            let confirmation = ctx.prisoners.delete_by_id(&id).await?;
            info!(id = %id, "Prisoner deleted");
            confirmation
        }
    };

    Ok(output)
}

/// Parses `key=value`; the value keeps its JSON type when it parses as JSON
/// and is a plain string otherwise.
/// # Errors
/// Returns an error for a missing `=`, an empty key or the reserved `id` key.
pub fn parse_field(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid field {raw:?}: expected KEY=VALUE");
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("invalid field {raw:?}: empty key");
    }
    if key == "id" {
        bail!("the id is assigned by the server and cannot be set");
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// # Errors
/// Returns the first field that fails to parse.
pub fn parse_fields<'a>(raw: impl IntoIterator<Item = &'a str>) -> Result<Map<String, Value>> {
    raw.into_iter().map(parse_field).collect()
}
