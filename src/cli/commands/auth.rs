use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::password::{DEFAULT_COST, MAX_COST, MIN_COST};

pub const ARG_SIGNING_SECRET: &str = "signing-secret";
pub const ARG_BOOTSTRAP_SECRET: &str = "bootstrap-secret";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SIGNING_SECRET)
                .long(ARG_SIGNING_SECRET)
                .help("HMAC secret used to sign bearer tokens")
                .env("TOLLGATE_SIGNING_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_BOOTSTRAP_SECRET)
                .long(ARG_BOOTSTRAP_SECRET)
                .help("Shared secret allowing unknown usernames to be provisioned on login")
                .long_help(
                    "Shared secret allowing unknown usernames to be provisioned on login. Clients present it as `Authorization: Bearer <secret>`. When unset, no new users can be created.",
                )
                .env("TOLLGATE_BOOTSTRAP_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt cost used when hashing new passwords")
                .env("TOLLGATE_BCRYPT_COST")
                .default_value("12")
                .value_parser(
                    clap::value_parser!(u32).range(i64::from(MIN_COST)..=i64::from(MAX_COST)),
                ),
        )
}

#[derive(Debug)]
pub struct Options {
    pub signing_secret: SecretString,
    pub bootstrap_secret: Option<SecretString>,
    pub bcrypt_cost: u32,
}

impl Options {
    /// Extract auth options from validated matches.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing or empty.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let signing_secret = matches
            .get_one::<String>(ARG_SIGNING_SECRET)
            .filter(|secret| !secret.is_empty())
            .cloned()
            .context("missing required argument: --signing-secret")?;

        let bootstrap_secret = matches
            .get_one::<String>(ARG_BOOTSTRAP_SECRET)
            .filter(|secret| !secret.is_empty())
            .cloned()
            .map(SecretString::from);

        let bcrypt_cost = matches
            .get_one::<u32>(ARG_BCRYPT_COST)
            .copied()
            .unwrap_or(DEFAULT_COST);

        Ok(Self {
            signing_secret: SecretString::from(signing_secret),
            bootstrap_secret,
            bcrypt_cost,
        })
    }
}
