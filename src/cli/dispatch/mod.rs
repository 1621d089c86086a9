//! Map validated CLI arguments to the action the binary should run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, ARG_DSN, ARG_PORT};
use anyhow::{Context, Result};
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or the DSN is not a URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .filter(|dsn| !dsn.is_empty())
        .map(|dsn| Url::parse(dsn).context("invalid --dsn"))
        .transpose()?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        signing_secret: auth_opts.signing_secret,
        bootstrap_secret: auth_opts.bootstrap_secret,
        bcrypt_cost: auth_opts.bcrypt_cost,
    }))
}
