pub mod git_cli_repo;
#[cfg(test)]
pub mod mock_git_repo;
pub mod ref_listing;
pub mod types;

pub use git_cli_repo::GitCliRepo;
pub use types::{BranchEntry, GitRepo};
