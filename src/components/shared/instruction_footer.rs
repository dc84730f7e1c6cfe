use ratatui::{
  style::{Color, Style},
  text::{Line, Span},
};

/// A key and what it does, e.g. `("enter", "checkout")`.
pub type Binding = (&'static str, &'static str);

const INDENT: &str = "  ";
const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = " …";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionFooter {
  key_style: Style,
  description_style: Style,
}

impl Default for InstructionFooter {
  fn default() -> Self {
    InstructionFooter { key_style: Style::default().fg(Color::Gray), description_style: Style::default().fg(Color::DarkGray) }
  }
}

impl InstructionFooter {
  /// Renders the bindings on one line, cutting off with an ellipsis past `width`.
  pub fn render(&self, bindings: &[Binding], width: u16) -> Line<'static> {
    let width = usize::from(width);
    let mut spans = vec![Span::raw(INDENT)];
    let mut used = INDENT.len();

    for (index, (key, description)) in bindings.iter().enumerate() {
      let separator = if index == 0 { "" } else { SEPARATOR };
      let entry_width =
        Span::raw(separator).width() + Span::raw(*key).width() + 1 + Span::raw(*description).width();
      if used + entry_width > width {
        if used + Span::raw(ELLIPSIS).width() <= width {
          spans.push(Span::styled(ELLIPSIS, self.description_style));
        }
        break;
      }
      if !separator.is_empty() {
        spans.push(Span::styled(separator, self.description_style));
      }
      spans.push(Span::styled(*key, self.key_style));
      spans.push(Span::styled(format!(" {description}"), self.description_style));
      used += entry_width;
    }

    Line::from(spans)
  }
}
