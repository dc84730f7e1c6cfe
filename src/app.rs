use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info};

use crate::{
  action::Action,
  components::{Component, branch_picker::BranchPicker},
  config::Config,
  git::{BranchEntry, GitRepo},
  tui::{self, Tui},
};

const FRAME_RATE: f64 = 30.0;

/// Owns the terminal and feeds terminal events and actions to the branch picker, one at a time.
pub struct App {
  pub branch_picker: BranchPicker,
  pub frame_rate: f64,
  // Set once the terminal has been handed to `git checkout`.
  pub released: bool,
}

impl App {
  pub fn new(repo: Arc<dyn GitRepo>, branches: Vec<BranchEntry>, config: &Config) -> Self {
    let branch_picker = BranchPicker::new(repo, branches, config);
    Self { branch_picker, frame_rate: FRAME_RATE, released: false }
  }

  pub fn frame_rate(mut self, frame_rate: f64) -> Self {
    self.frame_rate = frame_rate;
    self
  }

  /// Runs until the picker is done and returns the message to leave on screen, if any.
  pub async fn run(&mut self) -> Result<Option<String>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = Tui::new()?.frame_rate(self.frame_rate);
    tui.enter()?;

    self.branch_picker.register_action_handler(action_tx.clone())?;

    loop {
      // Actions queued by earlier events run before the next terminal event is read.
      tokio::select! {
        biased;
        Some(action) = action_rx.recv() => {
          self.dispatch(action, &mut tui, &action_tx).await?;
        },
        Some(e) = tui.next() => {
          self.handle_event(e, &action_tx).await?;
        },
      }

      if self.branch_picker.is_quitting() {
        break;
      }
    }
    tui.exit()?;

    info!(
      "Picker finished in {:?}, chosen: {:?}",
      self.branch_picker.phase(),
      self.branch_picker.chosen().map(|branch| branch.name.as_str())
    );
    Ok(self.branch_picker.final_message())
  }

  async fn handle_event(&mut self, event: tui::Event, action_tx: &UnboundedSender<Action>) -> Result<()> {
    match event {
      tui::Event::Render => action_tx.send(Action::Render)?,
      tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
      tui::Event::Error => error!("Failed to read terminal event"),
      tui::Event::Key(_) => {},
    }
    if let Some(action) = self.branch_picker.handle_events(Some(event)).await? {
      action_tx.send(action)?;
    }
    Ok(())
  }

  async fn dispatch(&mut self, action: Action, tui: &mut Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
    match &action {
      Action::Resize(w, h) if !self.released => tui.resize(Rect::new(0, 0, *w, *h))?,
      Action::Render => self.render(tui)?,
      Action::Checkout(branch) => {
        info!("Handing the terminal to `git checkout {}`", branch.name);
        tui.exit()?;
        self.released = true;
      },
      _ => {},
    }
    self.update(action, action_tx).await
  }

  async fn update(&mut self, action: Action, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if action != Action::Render {
      log::debug!("{action:?}");
    }
    if let Some(action) = self.branch_picker.update(action).await? {
      action_tx.send(action)?;
    }
    Ok(())
  }

  fn render(&mut self, tui: &mut Tui) -> Result<()> {
    if self.released {
      return Ok(());
    }
    let mut result = Ok(());
    tui.draw(|f| {
      result = self.branch_picker.draw(f, f.area());
    })?;
    result
  }
}
