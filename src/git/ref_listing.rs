use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::types::BranchEntry;

/// Upper bound on refs requested from git.
pub const MAX_REFS: usize = 150;

/// Remote-tracking aliases under this prefix duplicate a local branch and are hidden.
pub const REMOTE_PREFIX: &str = "origin/";

pub const REF_FORMAT: &str = "%(color:yellow)%(refname:short)%(color:reset) \
                              (%(color:green)%(committerdate:relative)%(color:reset)) %(authorname)";

lazy_static! {
  // <ref> (<relative age>) <author>
  static ref REF_LINE: Regex = Regex::new(r"(.*)\s[(](.*)[)]\s(\w+)").expect("ref line pattern is valid");
}

/// Parses a single, already uncolored, `<ref> (<relative age>) <author>` line.
pub fn parse_ref_line(line: &str) -> Option<BranchEntry> {
  let captures = REF_LINE.captures(line)?;
  let name = captures.get(1)?.as_str().trim();
  if name.is_empty() {
    return None;
  }
  Some(BranchEntry::new(name, captures.get(2)?.as_str(), captures.get(3)?.as_str()))
}

/// Turns raw `for-each-ref` output into branch entries, dropping blank lines,
/// `origin/` aliases and anything that does not look like a ref line.
pub fn parse_ref_listing(output: &str) -> Vec<BranchEntry> {
  let mut branches = Vec::new();
  for raw_line in output.lines() {
    let line = strip_ansi_escapes::strip_str(raw_line);
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    if line.starts_with(REMOTE_PREFIX) {
      continue;
    }
    match parse_ref_line(line) {
      Some(branch) => branches.push(branch),
      None => debug!("Skipping unparseable ref line: {}", line),
    }
  }
  branches
}
