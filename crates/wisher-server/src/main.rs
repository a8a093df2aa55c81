//! wisher-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `WISHER_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Bootstrapping
//!
//! Registration needs an invite code, and only administrators can issue them
//! over HTTP. Issue the first code from the command line, register, then
//! promote the account:
//!
//! ```text
//! wisher-server invite
//! wisher-server grant-admin ada@example.com
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wisher_core::Service;
use wisher_server::{ServerConfig, expand_tilde};
use wisher_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Wisher wishlist server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Issue a fresh invite code and print it.
  Invite,
  /// Mark the live user with this e-mail address as an administrator.
  GrantAdmin { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WISHER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let service = Arc::new(Service::new(store));

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(service, &server_cfg).await,
    Command::Invite => {
      let invite = service
        .ledger()
        .issue()
        .await
        .context("failed to issue invite")?;
      println!("{}", invite.code);
      Ok(())
    }
    Command::GrantAdmin { email } => {
      let user = service
        .grant_admin(&email)
        .await
        .with_context(|| format!("failed to grant admin to {email}"))?;
      tracing::info!(user = %user.id, "granted administrator rights");
      Ok(())
    }
  }
}

async fn serve(
  service: Arc<Service<SqliteStore>>,
  server_cfg: &ServerConfig,
) -> anyhow::Result<()> {
  let app = wisher_server::router(service);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
