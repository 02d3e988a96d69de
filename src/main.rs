//! archive-registry - serves the file registry command API over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archive_registry::{
    service, Authenticator, InMemoryAuthenticator, InMemoryModelStore, NewFileRecord, RecordStore,
    RegistryConfig, Role,
};

#[derive(Debug, Parser)]
#[command(name = "archive-registry", version, about = "Archive file registry command service")]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `bind_addr` from the config file.
    #[arg(long, env = "REGISTRY_BIND")]
    bind: Option<String>,

    /// JSON array of records to add before serving.
    #[arg(long, env = "REGISTRY_SEED")]
    seed: Option<PathBuf>,

    /// Email of the administrator account created at startup.
    #[arg(long, env = "REGISTRY_ADMIN_EMAIL", requires = "admin_password")]
    admin_email: Option<String>,

    /// Password of the administrator account created at startup.
    #[arg(long, env = "REGISTRY_ADMIN_PASSWORD", requires = "admin_email", hide_env_values = true)]
    admin_password: Option<String>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "REGISTRY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("archive_registry={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => RegistryConfig::from_path(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let mut store = RecordStore::with_config(InMemoryModelStore::new(), &config);
    if let Some(path) = &args.seed {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let records: Vec<NewFileRecord> =
            serde_json::from_str(&raw).context("seed file must be a JSON array of records")?;
        for record in records {
            if let Err(err) = store.add(record) {
                warn!(%err, "skipping seed record");
            }
        }
        info!(count = store.records().len(), "seed records loaded");
    }

    let auth = InMemoryAuthenticator::new();
    match (&args.admin_email, &args.admin_password) {
        (Some(email), Some(password)) => {
            let admin = auth
                .register(email, password, Some("Administrador"))
                .context("failed to create the administrator account")?;
            auth.set_role(&admin.uid, Role::Admin)?;
            info!(email = %admin.email, "administrator account ready");
        }
        _ => warn!("no administrator account configured; nobody can edit records"),
    }

    let addr = config.bind_addr.clone();
    let service = Arc::new(service::registry_service(store, Arc::new(auth), config));
    service::serve(service, &addr).await?;
    Ok(())
}
