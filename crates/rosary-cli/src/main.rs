//! `rosary` — command-line client for the Rosary server.
//!
//! # Usage
//!
//! ```
//! rosary --url http://localhost:8080 --user parish --password secret groups list
//! rosary --config ~/.config/rosary/config.toml mystery <profile-id>
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use rosary_core::{
  assignment::{AssignmentStatus, Period},
  mystery::MysteryId,
  roster::Role,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rosary", about = "Manage Rose groups and their mysteries")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the rosary server (default: http://localhost:8080).
  #[arg(long, env = "ROSARY_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "ROSARY_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "ROSARY_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List the twenty mysteries.
  Mysteries,
  /// Manage groups.
  #[command(subcommand)]
  Groups(GroupCmd),
  /// Manage member profiles.
  #[command(subcommand)]
  Profiles(ProfileCmd),
  /// Show a member's mystery.
  Mystery {
    profile: Uuid,
    #[arg(long)]
    period:  Option<Period>,
  },
  /// Acknowledge a member's mystery for the current month.
  Ack { profile: Uuid, mystery: i64 },
  /// Check whether a member acknowledged a mystery.
  Check {
    profile: Uuid,
    mystery: i64,
    #[arg(long)]
    period:  Option<Period>,
  },
  /// Monthly prayer intentions.
  #[command(subcommand)]
  Intentions(IntentionCmd),
}

#[derive(Subcommand, Debug)]
enum GroupCmd {
  List,
  Create { name: String },
  Rename { id: i64, name: String },
  Delete { id: i64 },
  /// Advance every member of the group by one mystery.
  Rotate {
    id: i64,
    /// The administrator performing the rotation.
    #[arg(long = "by")]
    performed_by: Uuid,
  },
  /// Show the rotation history.
  Rotations { id: i64 },
  /// Show every member's mystery and acknowledgment.
  Assignments {
    id:     i64,
    #[arg(long)]
    period: Option<Period>,
  },
}

#[derive(Subcommand, Debug)]
enum ProfileCmd {
  List {
    #[arg(long)]
    group: Option<i64>,
  },
  Add {
    full_name: String,
    email:     String,
    #[arg(long)]
    group:     Option<i64>,
    #[arg(long)]
    admin:     bool,
  },
  /// Move a member to another group, or out of any group without `--group`.
  Move {
    id:    Uuid,
    #[arg(long)]
    group: Option<i64>,
  },
  Role { id: Uuid, role: Role },
  Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum IntentionCmd {
  List {
    #[arg(long)]
    year: Option<i32>,
  },
  Show {
    /// Defaults to the current month.
    period: Option<Period>,
  },
  Set {
    period:  Period,
    #[arg(long)]
    title:   String,
    #[arg(long)]
    content: String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Mysteries => {
      for m in client.list_mysteries().await? {
        println!("{}", render::mystery_line(&m));
      }
    }
    Command::Groups(cmd) => groups(client, cmd).await?,
    Command::Profiles(cmd) => profiles(client, cmd).await?,
    Command::Mystery { profile, period } => {
      let status = client.mystery(profile, period).await?;
      if let AssignmentStatus::ComputeError { reason } = &status {
        tracing::warn!(%profile, %reason, "server could not compute the assignment");
      }
      println!("{}", render::assignment(&status));
    }
    Command::Ack { profile, mystery } => {
      let ack = client.acknowledge(profile, MysteryId::new(mystery)?).await?;
      println!("Acknowledged mystery {} ({})", ack.mystery_id, ack.ack_id);
    }
    Command::Check { profile, mystery, period } => {
      let done = client
        .check_acknowledgment(profile, MysteryId::new(mystery)?, period)
        .await?;
      println!("{}", if done { "acknowledged" } else { "not acknowledged" });
    }
    Command::Intentions(cmd) => intentions(client, cmd).await?,
  }
  Ok(())
}

async fn groups(client: &ApiClient, cmd: GroupCmd) -> Result<()> {
  match cmd {
    GroupCmd::List => {
      for g in client.list_groups().await? {
        println!("{}", render::group_line(&g));
      }
    }
    GroupCmd::Create { name } => {
      println!("{}", render::group_line(&client.create_group(&name).await?));
    }
    GroupCmd::Rename { id, name } => {
      println!("{}", render::group_line(&client.rename_group(id, &name).await?));
    }
    GroupCmd::Delete { id } => {
      client.delete_group(id).await?;
      println!("Deleted group {id}");
    }
    GroupCmd::Rotate { id, performed_by } => {
      let outcome = client.rotate(id, performed_by).await?;
      match outcome.rotation {
        Some(r) => println!("Rotated {} to generation {}", outcome.group.name, r.generation),
        None => println!("{} has no members; nothing to rotate", outcome.group.name),
      }
    }
    GroupCmd::Rotations { id } => {
      for r in client.rotations(id).await? {
        println!("{}", render::rotation_line(&r));
      }
    }
    GroupCmd::Assignments { id, period } => {
      for row in client.assignments(id, period).await? {
        println!("{}", render::member_line(&row));
      }
    }
  }
  Ok(())
}

async fn profiles(client: &ApiClient, cmd: ProfileCmd) -> Result<()> {
  match cmd {
    ProfileCmd::List { group } => {
      for p in client.list_profiles(group).await? {
        println!("{}", render::profile_line(&p));
      }
    }
    ProfileCmd::Add { full_name, email, group, admin } => {
      let role = if admin { Role::Admin } else { Role::User };
      let p = client.create_profile(&full_name, &email, role, group).await?;
      println!("{}", render::profile_line(&p));
    }
    ProfileCmd::Move { id, group } => {
      println!("{}", render::profile_line(&client.move_profile(id, group).await?));
    }
    ProfileCmd::Role { id, role } => {
      println!("{}", render::profile_line(&client.set_role(id, role).await?));
    }
    ProfileCmd::Delete { id } => {
      client.delete_profile(id).await?;
      println!("Deleted profile {id}");
    }
  }
  Ok(())
}

async fn intentions(client: &ApiClient, cmd: IntentionCmd) -> Result<()> {
  match cmd {
    IntentionCmd::List { year } => {
      for i in client.list_intentions(year).await? {
        println!("{}  {}", i.period, i.title);
      }
    }
    IntentionCmd::Show { period } => {
      let i = client.intention(period.unwrap_or_else(Period::current)).await?;
      println!("{}", render::intention(&i));
    }
    IntentionCmd::Set { period, title, content } => {
      let i = client.set_intention(period, &title, &content).await?;
      println!("{}", render::intention(&i));
    }
  }
  Ok(())
}
