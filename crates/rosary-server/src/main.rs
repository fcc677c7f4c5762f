//! `rosary-server` serves the Rosary JSON API for one parish.
//!
//! ```text
//! rosary-server [--config FILE] [serve]   run the HTTP server (default)
//! rosary-server hash-password             turn a password into auth_password_hash
//! ```
//!
//! Settings come from the TOML file (default `config.toml`), overridden by
//! `ROSARY_*` environment variables; see `config.example.toml`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rosary_core::assignment::RotationSchedule;
use rosary_server::{AppState, ServerConfig, auth::{self, AuthConfig}};
use rosary_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Parish Rose groups and their monthly mysteries")]
struct Cli {
  /// Server settings in TOML.
  #[arg(short, long, value_name = "FILE", default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
  /// Open the store and serve the API.
  Serve,
  /// Read a password from stdin and print its argon2 hash.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  match cli.command.unwrap_or(Mode::Serve) {
    Mode::HashPassword => {
      let hash = auth::hash_password(&password_from_stdin()?)
        .map_err(|e| anyhow::anyhow!("hashing password: {e}"))?;
      println!("{hash}");
      Ok(())
    }
    Mode::Serve => {
      let cfg = ServerConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
      serve(cfg).await
    }
  }
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let db = cfg.store_file();
  if let Some(dir) = db.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating {}", dir.display()))?;
  }

  let store = SqliteStore::open(&db)
    .await
    .with_context(|| format!("opening {}", db.display()))?
    .with_schedule(cfg.schedule);

  match cfg.schedule {
    RotationSchedule::Manual => tracing::info!(db = %db.display(), "rotation: manual only"),
    RotationSchedule::Monthly { anchor } => {
      tracing::info!(db = %db.display(), %anchor, "rotation: monthly")
    }
  }

  let app = rosary_server::router(AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig {
      username:      cfg.auth_username,
      password_hash: cfg.auth_password_hash,
    }),
  });

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("binding {address}"))?;
  tracing::info!(%address, "rosary-server ready");

  axum::serve(listener, app).await.context("serving HTTP")
}

/// One line of stdin without its line ending. Prompts on stderr, leaving
/// stdout for the hash.
fn password_from_stdin() -> anyhow::Result<String> {
  use std::io::{BufRead, Write};
  eprint!("Password to hash: ");
  std::io::stderr().flush().ok();
  let mut line = String::new();
  std::io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
