use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize)]
pub struct ListConfig {
  pub height: u16,
  pub default_width: u16,
}

/// A style as written in the config: an ANSI palette index plus attributes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StyleConfig {
  #[serde(default)]
  pub fg: Option<u8>,
  #[serde(default)]
  pub bold: bool,
  #[serde(default)]
  pub faint: bool,
}

impl From<&StyleConfig> for Style {
  fn from(config: &StyleConfig) -> Self {
    let mut style = Style::default();
    if let Some(fg) = config.fg {
      style = style.fg(Color::Indexed(fg));
    }
    if config.bold {
      style = style.add_modifier(Modifier::BOLD);
    }
    if config.faint {
      style = style.add_modifier(Modifier::DIM);
    }
    style
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StylesConfig {
  pub item: StyleConfig,
  pub selected: StyleConfig,
  pub faded: StyleConfig,
}

/// Resolved styles handed to the branch renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Styles {
  pub item: Style,
  pub selected: Style,
  pub faded: Style,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
  pub list: ListConfig,
  pub styles: StylesConfig,
}

impl Config {
  /// Loads the defaults compiled into the binary.
  pub fn new() -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
      .build()?
      .try_deserialize()
  }

  pub fn styles(&self) -> Styles {
    Styles {
      item: Style::from(&self.styles.item),
      selected: Style::from(&self.styles.selected),
      faded: Style::from(&self.styles.faded),
    }
  }
}
