use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::warn;

use crate::{
  app::App,
  cli::Cli,
  config::Config,
  git::{GitCliRepo, GitRepo},
  utils::{initialize_logging, initialize_panic_handler},
};

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod git;
pub mod tui;
pub mod utils;

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;

  let args = Cli::parse();
  let config = Config::new()?;

  let repo: Arc<dyn GitRepo> = Arc::new(GitCliRepo::new());
  let branches = match repo.recent_branches().await {
    Ok(branches) => branches,
    Err(e) => {
      warn!("Unable to list branches, starting with none: {}", e);
      Vec::new()
    },
  };

  let mut app = App::new(repo, branches, &config).frame_rate(args.frame_rate);
  if let Some(message) = app.run().await? {
    println!("\n {message}");
  }

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
