use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  widgets::Paragraph,
};
use tokio::{sync::mpsc::UnboundedSender, task::spawn};
use tracing::{error, info, warn};

use crate::{
  action::Action,
  components::{
    Component,
    shared::{
      instruction_footer::Binding,
      selection_list::{CursorMove, SelectionList},
    },
  },
  config::Config,
  git::{BranchEntry, GitRepo},
  tui::Frame,
};

mod branch_item;

pub use branch_item::BranchItemDelegate;

const INSTRUCTIONS: [Binding; 2] = [("enter", "checkout"), ("q", "quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Browsing,
  // A branch was chosen and the terminal is being handed over to git.
  Confirming,
  Executing,
  Done,
}

/// Lets the user pick a branch and runs the checkout for it.
///
/// Moves through [`Phase`] in one direction only. The checkout runs on a spawned
/// task and reports back with a single [`Action::CheckoutFinished`].
pub struct BranchPicker {
  repo: Arc<dyn GitRepo>,
  list: SelectionList<BranchEntry, BranchItemDelegate>,
  phase: Phase,
  chosen: Option<BranchEntry>,
  terminal_error: Option<String>,
  quitting: bool,
  action_tx: Option<UnboundedSender<Action>>,
}

impl BranchPicker {
  pub fn new(repo: Arc<dyn GitRepo>, branches: Vec<BranchEntry>, config: &Config) -> Self {
    let mut list =
      SelectionList::new(BranchItemDelegate::new(config.styles()), config.list.default_width, config.list.height)
        .with_additional_help(INSTRUCTIONS.to_vec());
    list.set_items(branches);

    BranchPicker {
      repo,
      list,
      phase: Phase::Browsing,
      chosen: None,
      terminal_error: None,
      quitting: false,
      action_tx: None,
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn chosen(&self) -> Option<&BranchEntry> {
    self.chosen.as_ref()
  }

  pub fn is_quitting(&self) -> bool {
    self.quitting
  }

  /// What is left on screen after the UI is gone: the checkout error, if there was one.
  pub fn final_message(&self) -> Option<String> {
    self.terminal_error.as_ref().map(|error| format!("error: {error}"))
  }

  fn confirm(&mut self) -> Action {
    match self.list.current_selection().cloned() {
      Some(branch) => {
        info!("Selected branch {}", branch.name);
        self.chosen = Some(branch.clone());
        self.phase = Phase::Confirming;
        Action::Checkout(branch)
      },
      None => Action::Quit,
    }
  }

  fn start_checkout(&mut self, branch: BranchEntry) {
    self.phase = Phase::Executing;
    let repo = self.repo.clone();
    let tx = self.action_tx.clone();

    spawn(async move {
      let error = match repo.checkout_branch(&branch).await {
        Ok(()) => None,
        Err(err) => {
          error!("Failed to checkout {}: {}", branch.name, err);
          Some(err.to_string())
        },
      };
      match tx {
        Some(tx) => {
          if let Err(err) = tx.send(Action::CheckoutFinished(error)) {
            error!("Failed to report checkout result: {}", err);
          }
        },
        None => warn!("No action handler registered, dropping checkout result"),
      }
    });
  }

  fn finish_checkout(&mut self, error: Option<String>) {
    self.terminal_error = error;
    self.quit();
  }

  fn quit(&mut self) {
    self.quitting = true;
    self.phase = Phase::Done;
  }
}

#[async_trait]
impl Component for BranchPicker {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.action_tx = Some(tx);
    Ok(())
  }

  async fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.phase != Phase::Browsing {
      return Ok(None);
    }
    let action = match key {
      KeyEvent { code: KeyCode::Char('c' | 'C'), modifiers: KeyModifiers::CONTROL, .. } => Some(Action::Quit),
      KeyEvent { code: KeyCode::Char('q') | KeyCode::Esc, .. } => Some(Action::Quit),
      KeyEvent { code: KeyCode::Enter, .. } => Some(Action::Confirm),
      _ => CursorMove::from_key(&key).map(Action::MoveCursor),
    };
    Ok(action)
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    let next = match action {
      Action::Resize(width, _) => {
        self.list.set_width(width);
        Some(Action::Render)
      },
      Action::MoveCursor(direction) if self.phase == Phase::Browsing => {
        self.list.move_cursor(direction);
        Some(Action::Render)
      },
      Action::Confirm if self.phase == Phase::Browsing => Some(self.confirm()),
      Action::Checkout(branch) if self.phase == Phase::Confirming => {
        self.start_checkout(branch);
        None
      },
      Action::CheckoutFinished(error) if self.phase == Phase::Executing => {
        self.finish_checkout(error);
        Some(Action::Quit)
      },
      // A confirmed checkout is never cancelled, even by a quit queued just after it.
      Action::Quit if self.phase == Phase::Browsing => {
        self.quit();
        None
      },
      _ => None,
    };
    Ok(next)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let chunks =
      Layout::default().direction(Direction::Vertical).constraints([Constraint::Length(1), Constraint::Min(0)]).split(area);
    let list = Paragraph::new(self.list.render(self.list.width()));
    f.render_widget(list, chunks[1]);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
  use tokio::sync::mpsc;

  use super::*;
  use crate::git::mock_git_repo::MockGitRepo;

  fn branches() -> Vec<BranchEntry> {
    vec![
      BranchEntry::new("main", "2 days ago", "alice"),
      BranchEntry::new("feature/x", "5 hours ago", "bob"),
      BranchEntry::new("release/1.0", "3 weeks ago", "carol"),
    ]
  }

  fn picker(repo: Arc<MockGitRepo>, branches: Vec<BranchEntry>) -> BranchPicker {
    BranchPicker::new(repo, branches, &Config::new().unwrap())
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
      .map(|y| (area.left()..area.right()).map(|x| buffer[(x, y)].symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn render(picker: &mut BranchPicker) -> String {
    let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
    terminal.draw(|f| picker.draw(f, f.area()).unwrap()).unwrap();
    buffer_text(terminal.backend().buffer())
  }

  #[tokio::test]
  async fn test_cancel_keys_quit_without_checkout() {
    let cancels = [key(KeyCode::Char('q')), key(KeyCode::Esc), KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)];
    for (cancel, items) in cancels.into_iter().flat_map(|cancel| [(cancel, branches()), (cancel, vec![])]) {
      let repo = Arc::new(MockGitRepo::default());
      let mut picker = picker(repo.clone(), items);
      picker.update(Action::MoveCursor(CursorMove::Last)).await.unwrap();

      let action = picker.handle_key_events(cancel).await.unwrap();
      assert_eq!(action, Some(Action::Quit));

      assert_eq!(picker.update(Action::Quit).await.unwrap(), None);
      assert_eq!(picker.phase(), Phase::Done);
      assert!(picker.is_quitting());
      assert_eq!(picker.chosen(), None);
      assert_eq!(picker.terminal_error, None);
      assert!(repo.checkouts().is_empty());
    }
  }

  #[tokio::test]
  async fn test_navigation_keys_move_cursor() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());

    let action = picker.handle_key_events(key(KeyCode::Char('j'))).await.unwrap();
    assert_eq!(action, Some(Action::MoveCursor(CursorMove::Down)));

    assert_eq!(picker.update(Action::MoveCursor(CursorMove::Down)).await.unwrap(), Some(Action::Render));
    assert_eq!(picker.list.cursor(), 1);
    assert_eq!(picker.phase(), Phase::Browsing);
  }

  #[tokio::test]
  async fn test_unbound_key_does_nothing() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());

    assert_eq!(picker.handle_key_events(key(KeyCode::Char('x'))).await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_confirm_chooses_item_under_cursor() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());
    picker.update(Action::MoveCursor(CursorMove::Down)).await.unwrap();
    picker.update(Action::MoveCursor(CursorMove::Down)).await.unwrap();

    assert_eq!(picker.handle_key_events(key(KeyCode::Enter)).await.unwrap(), Some(Action::Confirm));
    let action = picker.update(Action::Confirm).await.unwrap();

    assert_eq!(action, Some(Action::Checkout(branches()[2].clone())));
    assert_eq!(picker.chosen(), Some(&branches()[2]));
    assert_eq!(picker.phase(), Phase::Confirming);
  }

  #[tokio::test]
  async fn test_confirm_on_empty_list_quits() {
    let repo = Arc::new(MockGitRepo::default());
    let mut picker = picker(repo.clone(), vec![]);

    let action = picker.update(Action::Confirm).await.unwrap();
    assert_eq!(action, Some(Action::Quit));
    picker.update(Action::Quit).await.unwrap();

    assert_eq!(picker.phase(), Phase::Done);
    assert_eq!(picker.chosen(), None);
    assert_eq!(picker.terminal_error, None);
    assert!(repo.checkouts().is_empty());
  }

  #[tokio::test]
  async fn test_successful_checkout_finishes_without_error() {
    let repo = Arc::new(MockGitRepo::default());
    let mut picker = picker(repo.clone(), branches());
    let (tx, mut rx) = mpsc::unbounded_channel();
    picker.register_action_handler(tx).unwrap();
    picker.update(Action::MoveCursor(CursorMove::Down)).await.unwrap();

    let Some(checkout) = picker.update(Action::Confirm).await.unwrap() else {
      panic!("Expected Action::Checkout");
    };
    assert_eq!(picker.update(checkout).await.unwrap(), None);
    assert_eq!(picker.phase(), Phase::Executing);

    let finished = rx.recv().await.unwrap();
    assert_eq!(finished, Action::CheckoutFinished(None));
    assert_eq!(repo.checkouts(), vec!["feature/x".to_string()]);

    assert_eq!(picker.update(finished).await.unwrap(), Some(Action::Quit));
    assert_eq!(picker.phase(), Phase::Done);
    assert!(picker.is_quitting());
    assert_eq!(picker.terminal_error, None);
    assert_eq!(picker.final_message(), None);
  }

  #[tokio::test]
  async fn test_failed_checkout_is_reported() {
    let repo = Arc::new(MockGitRepo::failing_checkout("pathspec 'main' did not match"));
    let mut picker = picker(repo.clone(), branches());
    let (tx, mut rx) = mpsc::unbounded_channel();
    picker.register_action_handler(tx).unwrap();

    let checkout = picker.update(Action::Confirm).await.unwrap().unwrap();
    picker.update(checkout).await.unwrap();
    let finished = rx.recv().await.unwrap();
    assert_eq!(finished, Action::CheckoutFinished(Some("pathspec 'main' did not match".to_string())));

    picker.update(finished).await.unwrap();

    assert_eq!(picker.phase(), Phase::Done);
    assert_eq!(picker.chosen(), Some(&branches()[0]));
    assert_eq!(picker.terminal_error.as_deref(), Some("pathspec 'main' did not match"));
    assert_eq!(picker.final_message(), Some("error: pathspec 'main' did not match".to_string()));
  }

  #[tokio::test]
  async fn test_quit_queued_behind_confirm_keeps_checkout() {
    let repo = Arc::new(MockGitRepo::default());
    let mut picker = picker(repo.clone(), branches());
    let (tx, mut rx) = mpsc::unbounded_channel();
    picker.register_action_handler(tx).unwrap();

    let confirm = picker.handle_key_events(key(KeyCode::Enter)).await.unwrap().unwrap();
    let quit = picker.handle_key_events(key(KeyCode::Char('q'))).await.unwrap().unwrap();

    let checkout = picker.update(confirm).await.unwrap().unwrap();
    assert_eq!(picker.update(quit).await.unwrap(), None);
    assert_eq!(picker.phase(), Phase::Confirming);
    assert!(!picker.is_quitting());

    picker.update(checkout).await.unwrap();
    assert_eq!(picker.update(Action::Quit).await.unwrap(), None);
    assert_eq!(picker.phase(), Phase::Executing);

    let finished = rx.recv().await.unwrap();
    picker.update(finished).await.unwrap();
    assert_eq!(repo.checkouts(), vec!["main".to_string()]);
    assert_eq!(picker.phase(), Phase::Done);
  }

  #[tokio::test]
  async fn test_keys_ignored_once_checkout_started() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());
    picker.update(Action::Confirm).await.unwrap();

    assert_eq!(picker.handle_key_events(key(KeyCode::Char('q'))).await.unwrap(), None);
    assert_eq!(picker.handle_key_events(key(KeyCode::Enter)).await.unwrap(), None);
    assert_eq!(picker.update(Action::Confirm).await.unwrap(), None);
    assert_eq!(picker.chosen(), Some(&branches()[0]));
  }

  #[tokio::test]
  async fn test_completion_before_checkout_is_ignored() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());

    assert_eq!(picker.update(Action::CheckoutFinished(Some("late".to_string()))).await.unwrap(), None);
    assert_eq!(picker.phase(), Phase::Browsing);
    assert_eq!(picker.terminal_error, None);
  }

  #[tokio::test]
  async fn test_resize_only_changes_width() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());
    picker.update(Action::MoveCursor(CursorMove::Down)).await.unwrap();

    assert_eq!(picker.update(Action::Resize(120, 40)).await.unwrap(), Some(Action::Render));
    assert_eq!(picker.list.width(), 120);
    assert_eq!(picker.list.cursor(), 1);
    assert_eq!(picker.chosen(), None);

    picker.update(Action::Confirm).await.unwrap();
    picker.update(Action::Resize(80, 24)).await.unwrap();
    assert_eq!(picker.list.cursor(), 1);
    assert_eq!(picker.chosen(), Some(&branches()[1]));
  }

  #[tokio::test]
  async fn test_draw_shows_branches() {
    let mut picker = picker(Arc::new(MockGitRepo::default()), branches());
    picker.update(Action::Resize(60, 16)).await.unwrap();

    let screen = render(&mut picker);
    let lines: Vec<&str> = screen.lines().collect();

    assert_eq!(lines[0].trim_end(), "");
    assert_eq!(lines[1].trim_end(), "★ (2 days ago) main");
    assert_eq!(lines[2].trim_end(), "☆ (5 hours ago) feature/x");
    assert_eq!(lines[3].trim_end(), "☆ (3 weeks ago) release/1.0");
    assert_eq!(lines[13].trim_end(), "  ↑/k up • ↓/j down • enter checkout • q quit");
  }
}
