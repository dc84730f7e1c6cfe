use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  style::{Modifier, Style},
  text::{Line, Span, Text},
};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::instruction_footer::{Binding, InstructionFooter};
use crate::components::traits::item_delegate::ItemDelegate;

// Pagination row and help row, each followed by a blank row.
const CHROME_ROWS: u16 = 4;
const EMPTY_MESSAGE: &str = "No items.";
const ACTIVE_DOT: &str = "•";
const INACTIVE_DOT: &str = "○";
const INDENT: &str = "  ";

const NAVIGATION_HELP: [Binding; 2] = [("↑/k", "up"), ("↓/j", "down")];
const PAGE_HELP: [Binding; 2] = [("←/h", "prev page"), ("→/l", "next page")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum CursorMove {
  Up,
  Down,
  PageUp,
  PageDown,
  First,
  Last,
}

impl CursorMove {
  /// The navigation bound to `key`, if any.
  pub fn from_key(key: &KeyEvent) -> Option<CursorMove> {
    match key.code {
      KeyCode::Up | KeyCode::Char('k') => Some(CursorMove::Up),
      KeyCode::Down | KeyCode::Char('j') => Some(CursorMove::Down),
      KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h' | 'b' | 'u') => Some(CursorMove::PageUp),
      KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l' | 'f' | 'd') => Some(CursorMove::PageDown),
      KeyCode::Home | KeyCode::Char('g') => Some(CursorMove::First),
      KeyCode::End | KeyCode::Char('G') => Some(CursorMove::Last),
      _ => None,
    }
  }
}

/// A paginated single-selection list. The cursor always stays within `items`
/// and moves clamp at either end.
#[derive(Debug)]
pub struct SelectionList<T, D> {
  items: Vec<T>,
  delegate: D,
  cursor: usize,
  width: u16,
  height: u16,
  footer: InstructionFooter,
  additional_help: Vec<Binding>,
}

impl<T, D: ItemDelegate<T>> SelectionList<T, D> {
  pub fn new(delegate: D, width: u16, height: u16) -> Self {
    SelectionList {
      items: Vec::new(),
      delegate,
      cursor: 0,
      width,
      height,
      footer: InstructionFooter::default(),
      additional_help: Vec::new(),
    }
  }

  /// Bindings shown in the footer after the list's own navigation keys.
  pub fn with_additional_help(mut self, bindings: Vec<Binding>) -> Self {
    self.additional_help = bindings;
    self
  }

  pub fn set_items(&mut self, items: Vec<T>) {
    self.items = items;
    self.cursor = 0;
  }

  pub fn set_width(&mut self, width: u16) {
    self.width = width;
  }

  pub fn width(&self) -> u16 {
    self.width
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn current_selection(&self) -> Option<&T> {
    self.items.get(self.cursor)
  }

  pub fn move_cursor(&mut self, direction: CursorMove) {
    if self.items.is_empty() {
      return;
    }
    let last = self.items.len() - 1;
    let per_page = self.per_page();
    self.cursor = match direction {
      CursorMove::Up => self.cursor.saturating_sub(1),
      CursorMove::Down => (self.cursor + 1).min(last),
      CursorMove::PageUp if self.cursor >= per_page => self.cursor - per_page,
      CursorMove::PageDown if self.page() + 1 < self.total_pages() => (self.cursor + per_page).min(last),
      CursorMove::PageUp | CursorMove::PageDown => self.cursor,
      CursorMove::First => 0,
      CursorMove::Last => last,
    };
  }

  /// Items that fit on one page once pagination and help rows are taken out.
  pub fn per_page(&self) -> usize {
    let available = self.height.saturating_sub(CHROME_ROWS);
    let row_height = (self.delegate.height() + self.delegate.spacing()).max(1);
    usize::from(available / row_height).max(1)
  }

  pub fn page(&self) -> usize {
    self.cursor / self.per_page()
  }

  pub fn total_pages(&self) -> usize {
    self.items.len().div_ceil(self.per_page()).max(1)
  }

  /// The current page, its pagination indicator and the help line.
  pub fn render(&self, width: u16) -> Text<'static> {
    let per_page = self.per_page();
    let body_rows = per_page * usize::from(self.delegate.height() + self.delegate.spacing());
    let mut lines = Vec::with_capacity(body_rows + usize::from(CHROME_ROWS));

    if self.items.is_empty() {
      lines.push(Line::styled(format!("{INDENT}{EMPTY_MESSAGE}"), Style::default().add_modifier(Modifier::DIM)));
    } else {
      let start = self.page() * per_page;
      let end = (start + per_page).min(self.items.len());
      for index in start..end {
        lines.push(self.delegate.render(&self.items, index, index == self.cursor));
        for _ in 1..self.delegate.height() {
          lines.push(Line::default());
        }
        if index + 1 < end {
          for _ in 0..self.delegate.spacing() {
            lines.push(Line::default());
          }
        }
      }
    }
    while lines.len() < body_rows {
      lines.push(Line::default());
    }

    lines.push(self.pagination(width));
    lines.push(Line::default());
    lines.push(self.footer.render(&self.help(), width));
    lines.push(Line::default());
    Text::from(lines)
  }

  fn pagination(&self, width: u16) -> Line<'static> {
    let total = self.total_pages();
    if total <= 1 {
      return Line::default();
    }
    let page = self.page();
    let dots: String = (0..total).map(|index| if index == page { ACTIVE_DOT } else { INACTIVE_DOT }).collect();
    let dots = format!("{INDENT}{dots}");
    if Span::raw(dots.as_str()).width() > usize::from(width) {
      return Line::from(format!("{INDENT}{}/{}", page + 1, total));
    }
    Line::from(dots)
  }

  fn help(&self) -> Vec<Binding> {
    let mut bindings = NAVIGATION_HELP.to_vec();
    if self.total_pages() > 1 {
      bindings.extend(PAGE_HELP);
    }
    bindings.extend(self.additional_help.iter().copied());
    bindings
  }
}
