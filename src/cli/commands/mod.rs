use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_STATE_FILE};
use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        PossibleValuesParser, ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

/// Log level names in verbosity order; index 4 is the most verbose.
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its index, `0` (error) through `4` (trace).
fn parse_log_level(level: &str) -> Result<u8, String> {
    let level = level.trim();
    let index = match level.parse::<usize>() {
        Ok(index) => Some(index).filter(|index| *index < LOG_LEVELS.len()),
        Err(_) => LOG_LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(level)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level {level:?}: expected 0-4 or one of {}",
                LOG_LEVELS.join(", ")
            )
        })
}

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_log_level)
}

fn id_arg() -> Arg {
    Arg::new("id").help("Record id").required(true)
}

fn field_arg() -> Arg {
    Arg::new("field")
        .short('f')
        .long("field")
        .help("Field as key=value; values that parse as JSON keep their type")
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
}

fn prisoners_command() -> Command {
    Command::new("prisoners")
        .about("Manage prisoner records (public)")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List every prisoner"))
        .subcommand(Command::new("get").about("Show one prisoner").arg(id_arg()))
        .subcommand(
            Command::new("add")
                .about("Create a prisoner")
                .arg(field_arg().required(true)),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of an existing prisoner")
                .arg(id_arg())
                .arg(field_arg().required(true)),
        )
        .subcommand(Command::new("delete").about("Delete a prisoner").arg(id_arg()))
}

fn users_command() -> Command {
    Command::new("users")
        .about("Manage users (requires login)")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List every user"))
        .subcommand(
            Command::new("add")
                .about("Create a user")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help("Username")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Change a user's username and/or password")
                .arg(id_arg())
                .arg(Arg::new("username").long("username").help("New username"))
                .arg(Arg::new("password").long("password").help("New password"))
                .group(
                    clap::ArgGroup::new("changes")
                        .args(["username", "password"])
                        .multiple(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("delete").about("Delete a user").arg(id_arg()))
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("cellblock")
        .about("Prisoner records client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(env!("CELLBLOCK_LONG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the REST API")
                .default_value(DEFAULT_API_BASE_URL)
                .env("CELLBLOCK_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("state-file")
                .long("state-file")
                .help("File holding the persisted session marker")
                .default_value(DEFAULT_STATE_FILE)
                .env("CELLBLOCK_STATE_FILE")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds (default: none)")
                .env("CELLBLOCK_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .help("Log output format")
                .default_value("text")
                .env("CELLBLOCK_LOG_FORMAT")
                .global(true)
                .value_parser(PossibleValuesParser::new(["text", "json"])),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("CELLBLOCK_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with a username and password")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Username")
                        .env("CELLBLOCK_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Password")
                        .env("CELLBLOCK_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out and remove the session marker"))
        .subcommand(Command::new("status").about("Show whether a session is active"))
        .subcommand(
            Command::new("open")
                .about("Navigate to a route and render it")
                .arg(
                    Arg::new("path")
                        .help("Route path: /, /login or /admin")
                        .default_value("/"),
                ),
        )
        .subcommand(prisoners_command())
        .subcommand(users_command())
}
