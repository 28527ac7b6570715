use std::env;

use tracing::warn;

use crate::theme::ThemeMode;

pub const LEGACY_ENCODING_VAR: &str = "BLACKNOTE_LEGACY_ENCODING";
pub const THEME_VAR: &str = "BLACKNOTE_THEME";

const MIN_FONT_SIZE: f32 = 6.0;
const MAX_FONT_SIZE: f32 = 72.0;

/// Font families the editor can render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Monospace,
    Proportional,
}

impl FontFamily {
    pub const ALL: [FontFamily; 2] = [FontFamily::Monospace, FontFamily::Proportional];

    pub fn label(self) -> &'static str {
        match self {
            FontFamily::Monospace => "Monospace",
            FontFamily::Proportional => "Proportional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontConfig {
    pub family: FontFamily,
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: FontFamily::Monospace,
            size: 15.0,
        }
    }
}

impl FontConfig {
    pub fn with_size(self, size: f32) -> Self {
        Self {
            size: clamp_font_size(size),
            ..self
        }
    }
}

pub fn clamp_font_size(size: f32) -> f32 {
    if size.is_finite() {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    } else {
        FontConfig::default().size
    }
}

/// Start-up configuration. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub font: FontConfig,
    pub word_wrap: bool,
    pub status_bar: bool,
    pub theme: ThemeMode,
    /// Encoding label used when a file is not valid UTF-8, or `auto` to detect.
    pub legacy_encoding: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [980.0, 640.0],
            font: FontConfig::default(),
            word_wrap: true,
            status_bar: true,
            theme: ThemeMode::Dark,
            legacy_encoding: "euc-kr".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unusable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(label) = lookup(LEGACY_ENCODING_VAR) {
            let label = label.trim();
            if label.is_empty() {
                warn!(var = LEGACY_ENCODING_VAR, "ignoring empty encoding override");
            } else {
                config.legacy_encoding = label.to_ascii_lowercase();
            }
        }
        if let Some(value) = lookup(THEME_VAR) {
            match value.parse::<ThemeMode>() {
                Ok(mode) => config.theme = mode,
                Err(err) => warn!(%err, var = THEME_VAR, "ignoring theme override"),
            }
        }
        config
    }
}
