use crate::{
    auth::{AuthConfig, AuthState},
    cli::telemetry,
    store::{CredentialStore, MemoryCredentialStore, PgCredentialStore},
    tollgate,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info, warn};
use url::Url;

pub struct Args {
    pub port: u16,
    pub dsn: Option<Url>,
    pub signing_secret: SecretString,
    pub bootstrap_secret: Option<SecretString>,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dsn = self.dsn.as_ref().map(|dsn| {
            let mut redacted = dsn.clone();
            if redacted.password().is_some() {
                let _ = redacted.set_password(Some("***"));
            }
            redacted.to_string()
        });

        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &dsn)
            .field("signing_secret", &"***")
            .field("bootstrap_secret", &self.bootstrap_secret.as_ref().map(|_| "***"))
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, the schema cannot be applied, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store: Arc<dyn CredentialStore> = if let Some(dsn) = &args.dsn {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn.as_str())
            .await
            .context("Failed to connect to database")?;

        let store = PgCredentialStore::new(pool, args.bcrypt_cost);
        store
            .migrate()
            .await
            .context("Failed to apply database schema")?;
        Arc::new(store)
    } else {
        warn!("No --dsn given, users are kept in memory only");
        Arc::new(MemoryCredentialStore::new(args.bcrypt_cost))
    };

    let auth_config =
        AuthConfig::new(args.signing_secret).with_bootstrap_secret(args.bootstrap_secret);
    let auth_state = Arc::new(AuthState::new(&auth_config, store));

    if auth_state.authenticator().provisioning_enabled() {
        info!("Bootstrap provisioning enabled");
    } else {
        info!("Bootstrap provisioning disabled, only existing users can log in");
    }

    let result = tollgate::new(args.port, auth_state).await;

    telemetry::shutdown_tracer();

    result
}
