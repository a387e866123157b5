use std::io;

use serde::Deserialize;

/// When a terminal report may use ANSI colors.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Color only when stdout is a terminal.
    #[default]
    #[serde(alias = "automatic")]
    Auto,
    Always,
    Never,
}

impl ColorSetting {
    pub fn use_color(self) -> bool {
        match self {
            ColorSetting::Auto => io::stdout().supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }
}

pub(crate) mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const CYAN: &str = "\x1b[36m";
}

pub trait SupportsColor {
    fn supports_color(&self) -> bool;
}

impl<T: io::IsTerminal> SupportsColor for T {
    fn supports_color(&self) -> bool {
        self.is_terminal()
    }
}
