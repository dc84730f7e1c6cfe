use ratatui::text::Line;

/// Renders one row of a [`SelectionList`](crate::components::shared::selection_list::SelectionList).
pub trait ItemDelegate<T>: Send + Sync {
  /// Rows taken by a single item.
  fn height(&self) -> u16 {
    1
  }

  /// Blank rows between items.
  fn spacing(&self) -> u16 {
    0
  }

  /// Renders `items[index]`; `is_selected` is true when the cursor is on it.
  fn render(&self, items: &[T], index: usize, is_selected: bool) -> Line<'static>;
}
