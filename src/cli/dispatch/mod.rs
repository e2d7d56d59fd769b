use crate::cli::{
    actions::{
        Action,
        prisoners::{PrisonerCommand, parse_fields},
        session::LoginArgs,
        users::UserCommand,
    },
    globals::GlobalArgs,
};
use crate::routes::HOME_PATH;
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use secrecy::SecretString;
use serde_json::{Map, Value};

/// # Errors
/// Returns an error if the global arguments are invalid.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    GlobalArgs::new(
        matches.get_one::<String>("api-url").map(String::as_str),
        matches.get_one::<String>("state-file").map(String::as_str),
        matches.get_one::<u64>("timeout").copied(),
    )
}

/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(LoginArgs {
            username: required(sub_m, "username")?,
            password: SecretString::from(required(sub_m, "password")?),
        })),
        Some(("logout", _)) => Ok(Action::Logout),
        Some(("status", _)) => Ok(Action::Status),
        Some(("open", sub_m)) => Ok(Action::Open {
            path: sub_m
                .get_one::<String>("path")
                .cloned()
                .unwrap_or_else(|| HOME_PATH.to_string()),
        }),
        Some(("prisoners", sub_m)) => Ok(Action::Prisoners(prisoner_command(sub_m)?)),
        Some(("users", sub_m)) => Ok(Action::Users(user_command(sub_m)?)),
        Some((name, _)) => bail!("unknown command: {name}"),
        None => bail!("no command given"),
    }
}

fn prisoner_command(matches: &ArgMatches) -> Result<PrisonerCommand> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(PrisonerCommand::List),
        Some(("get", sub_m)) => Ok(PrisonerCommand::Get {
            id: required(sub_m, "id")?,
        }),
        Some(("add", sub_m)) => Ok(PrisonerCommand::Add {
            fields: fields(sub_m)?,
        }),
        Some(("update", sub_m)) => Ok(PrisonerCommand::Update {
            id: required(sub_m, "id")?,
            fields: fields(sub_m)?,
        }),
        Some(("delete", sub_m)) => Ok(PrisonerCommand::Delete {
            id: required(sub_m, "id")?,
        }),
        _ => bail!("missing prisoners subcommand"),
    }
}

fn user_command(matches: &ArgMatches) -> Result<UserCommand> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(UserCommand::List),
        Some(("add", sub_m)) => Ok(UserCommand::Add {
            username: required(sub_m, "username")?,
            password: SecretString::from(required(sub_m, "password")?),
        }),
        Some(("update", sub_m)) => Ok(UserCommand::Update {
            id: required(sub_m, "id")?,
            username: sub_m.get_one::<String>("username").cloned(),
            password: sub_m
                .get_one::<String>("password")
                .cloned()
                .map(SecretString::from),
        }),
        Some(("delete", sub_m)) => Ok(UserCommand::Delete {
            id: required(sub_m, "id")?,
        }),
        _ => bail!("missing users subcommand"),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn fields(matches: &ArgMatches) -> Result<Map<String, Value>> {
    let raw = matches
        .get_many::<String>("field")
        .into_iter()
        .flatten()
        .map(String::as_str);
    parse_fields(raw)
}
