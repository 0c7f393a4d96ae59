//! `dealbook` — example wiring for the dealbook core.
//!
//! # Usage
//!
//! ```text
//! dealbook demo --env-file .env
//! dealbook describe-user --tab-number 17 --username steve
//! dealbook db-url
//! ```
//!
//! `DB_USER`, `DB_PASS` and `DB_NAME` must be set in the environment or in
//! the env file; `DB_HOST` and `DB_PORT` default to `postgres` and `5432`.

mod demo;
mod dotenv;
mod profile;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use demo::DemoOutcome;
use profile::UserProfile;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dealbook", about = "Validated deals over a mock repository")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Build a deal, list it, update its comment and store it.
  Demo {
    /// File of `KEY=VALUE` lines read before the environment.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
  },
  /// Describe a profile in one sentence.
  DescribeUser {
    #[arg(long)]
    tab_number: i64,
    #[arg(long)]
    username:   String,
  },
  /// Print the database URL with the password masked.
  DbUrl {
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match Cli::parse().command {
    Command::Demo { env_file } => {
      let outcome = demo::run(&load_settings(&env_file)?)?;
      print_demo(&outcome)
    }
    Command::DescribeUser {
      tab_number,
      username,
    } => {
      let profile = UserProfile {
        tab_number,
        username,
      };
      println!("{}", profile::describe(&profile));
      Ok(())
    }
    Command::DbUrl { env_file } => {
      println!("{}", load_settings(&env_file)?.redacted_db_url());
      Ok(())
    }
  }
}

fn load_settings(env_file: &std::path::Path) -> Result<Settings> {
  Settings::load(env_file)
    .with_context(|| format!("failed to load settings (env file {env_file:?})"))
}

fn print_demo(outcome: &DemoOutcome) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(&outcome.records)?);
  match &outcome.updated {
    Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
    None => println!("deal {} not found", demo::DEAL_ID),
  }
  println!(
    "stored {} deal(s), {} rejected",
    outcome.report.accepted,
    outcome.report.rejected.len()
  );
  Ok(())
}
