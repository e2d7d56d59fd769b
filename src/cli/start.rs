use crate::cli::{
    actions::Action,
    commands,
    dispatch::{globals, handler},
    globals::GlobalArgs,
    telemetry::{self, LogFormat},
};
use anyhow::Result;

/// Start the CLI
/// # Errors
/// Returns an error if logging cannot be initialized or the arguments are invalid.
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level =
        telemetry::level_from_verbosity(matches.get_one::<u8>("verbosity").map_or(0, |&v| v));

    let log_format = matches
        .get_one::<String>("log-format")
        .map_or(LogFormat::Text, |format| LogFormat::parse(format));

    telemetry::init(verbosity_level, log_format)?;

    let globals = globals(&matches)?;
    let action = handler(&matches)?;

    Ok((action, globals))
}
