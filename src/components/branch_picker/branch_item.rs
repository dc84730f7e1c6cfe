use ratatui::{
  style::Style,
  text::{Line, Span},
};

use crate::{components::traits::item_delegate::ItemDelegate, config::Styles, git::BranchEntry};

const ICON: &str = "☆ ";
const SELECTED_ICON: &str = "★ ";

/// Renders a branch as `☆ (3 days ago) main`, starred and highlighted under the cursor.
#[derive(Debug, Clone, Copy)]
pub struct BranchItemDelegate {
  styles: Styles,
}

impl BranchItemDelegate {
  pub fn new(styles: Styles) -> Self {
    BranchItemDelegate { styles }
  }
}

impl ItemDelegate<BranchEntry> for BranchItemDelegate {
  fn render(&self, items: &[BranchEntry], index: usize, is_selected: bool) -> Line<'static> {
    let Some(branch) = items.get(index) else {
      return Line::default();
    };
    let (icon, name_style): (&str, Style) =
      if is_selected { (SELECTED_ICON, self.styles.selected) } else { (ICON, self.styles.item) };

    Line::from(vec![
      Span::raw(icon),
      Span::styled(format!("({})", branch.relative_age), self.styles.faded),
      Span::styled(format!(" {}", branch.name), name_style),
    ])
  }
}
