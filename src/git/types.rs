use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A branch reference that can be checked out, as reported by `git for-each-ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
  pub name: String,
  pub relative_age: String,
  pub author: String,
}

impl BranchEntry {
  pub fn new(name: impl Into<String>, relative_age: impl Into<String>, author: impl Into<String>) -> Self {
    BranchEntry { name: name.into(), relative_age: relative_age.into(), author: author.into() }
  }
}

#[async_trait]
pub trait GitRepo: Send + Sync {
  /// Local and remote-tracking branches, most recently committed first.
  async fn recent_branches(&self) -> Result<Vec<BranchEntry>, Error>;

  /// Switches the working tree to `branch`. Git's own output goes straight to the terminal.
  async fn checkout_branch(&self, branch: &BranchEntry) -> Result<(), Error>;
}
