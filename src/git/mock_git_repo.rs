use std::sync::Mutex;

use async_trait::async_trait;

use super::{BranchEntry, GitRepo};
use crate::error::Error;

#[derive(Debug, Default)]
pub struct MockGitRepo {
  branches: Vec<BranchEntry>,
  checkout_error: Option<String>,
  checkouts: Mutex<Vec<String>>,
}

impl MockGitRepo {
  pub fn with_branches(branches: Vec<BranchEntry>) -> Self {
    MockGitRepo { branches, ..Default::default() }
  }

  pub fn failing_checkout(message: &str) -> Self {
    MockGitRepo { checkout_error: Some(message.to_string()), ..Default::default() }
  }

  /// Names passed to `checkout_branch`, in call order.
  pub fn checkouts(&self) -> Vec<String> {
    self.checkouts.lock().unwrap().clone()
  }
}

#[async_trait]
impl GitRepo for MockGitRepo {
  async fn recent_branches(&self) -> Result<Vec<BranchEntry>, Error> {
    Ok(self.branches.clone())
  }

  async fn checkout_branch(&self, branch: &BranchEntry) -> Result<(), Error> {
    self.checkouts.lock().unwrap().push(branch.name.clone());
    match &self.checkout_error {
      Some(message) => Err(Error::Git(message.clone())),
      None => Ok(()),
    }
  }
}
