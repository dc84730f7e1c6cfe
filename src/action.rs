use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{components::shared::selection_list::CursorMove, git::BranchEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  Checkout(BranchEntry),
  // Carries the failure message, if any.
  CheckoutFinished(Option<String>),
  Confirm,
  MoveCursor(CursorMove),
  Quit,
  Render,
  Resize(u16, u16),
}
