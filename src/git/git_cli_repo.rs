use std::{
  process::Stdio,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use async_trait::async_trait;
use signal_hook::{SigId, consts::SIGINT, flag, low_level};
use tokio::process::Command as TokioCommand;
use tracing::{error, info, warn};

use crate::{
  error::Error,
  git::{
    ref_listing::{MAX_REFS, REF_FORMAT, parse_ref_listing},
    types::{BranchEntry, GitRepo},
  },
};

#[derive(Debug, Default)]
pub struct GitCliRepo {}

impl GitCliRepo {
  pub fn new() -> Self {
    GitCliRepo {}
  }
}

/// Catches Ctrl+C while git owns the terminal so it stops git, not the picker.
struct SigintGuard {
  interrupted: Arc<AtomicBool>,
  released: Arc<AtomicBool>,
  sig_id: SigId,
}

impl SigintGuard {
  fn install() -> std::io::Result<Self> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let released = Arc::new(AtomicBool::new(false));
    // Unregistering leaves the handler installed, so once released SIGINT falls back to its default action.
    flag::register_conditional_default(SIGINT, Arc::clone(&released))?;
    let sig_id = flag::register(SIGINT, Arc::clone(&interrupted))?;
    Ok(SigintGuard { interrupted, released, sig_id })
  }

  /// Returns whether SIGINT arrived while the guard was installed.
  fn release(self) -> bool {
    low_level::unregister(self.sig_id);
    self.released.store(true, Ordering::SeqCst);
    self.interrupted.load(Ordering::SeqCst)
  }
}

async fn run_git_command(args: &[&str]) -> Result<String, Error> {
  let args_log_command = args.join(" ");
  info!("Running `git {}`", args_log_command);
  let output = TokioCommand::new("git").args(args).output().await.map_err(|err| {
    error!("Failed to run `git {}`, error: {}", args_log_command, err);
    Error::Git(err.to_string())
  })?;

  if !output.status.success() {
    let err = String::from_utf8(output.stderr)?;
    error!("Failed to run `git {}`, error: {}", args_log_command, err);
    let message = if err.trim().is_empty() { output.status.to_string() } else { err.trim().to_string() };
    return Err(Error::Git(message));
  }
  let content = String::from_utf8(output.stdout)?;
  info!("Received {} lines from `git {}`", content.lines().count(), args_log_command);
  Ok(content)
}

#[async_trait]
impl GitRepo for GitCliRepo {
  async fn recent_branches(&self) -> Result<Vec<BranchEntry>, Error> {
    let count = format!("--count={MAX_REFS}");
    let format = format!("--format={REF_FORMAT}");
    let res =
      run_git_command(&["for-each-ref", "--sort=-committerdate", &count, &format, "refs/heads", "refs/remotes"]).await?;
    Ok(parse_ref_listing(&res))
  }

  async fn checkout_branch(&self, branch: &BranchEntry) -> Result<(), Error> {
    info!("Running `git checkout {}`", branch.name);

    let guard = SigintGuard::install()?;

    let status = TokioCommand::new("git")
      .arg("checkout")
      .arg(&branch.name)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .await;
    let interrupted = guard.release();

    let status = status?;
    if interrupted {
      warn!("Checkout of {} was interrupted", branch.name);
    }
    if !status.success() {
      error!("`git checkout {}` exited with {}", branch.name, status);
      return Err(Error::Checkout { branch: branch.name.clone(), status });
    }
    info!("Checked out {}", branch.name);
    Ok(())
  }
}
