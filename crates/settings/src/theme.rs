use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_hex(input: &str) -> Result<Self, ThemeError> {
        parse_hex(input).map_err(|reason| ThemeError::InvalidColor {
            value: input.to_string(),
            reason,
        })
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark (Black)",
            ThemeMode::Light => "Light",
        }
    }

    fn defaults(self) -> Palette {
        match self {
            ThemeMode::Dark => Palette {
                background: Color::rgb(0x0f, 0x0f, 0x0f),
                foreground: Color::rgb(0xe6, 0xe6, 0xe6),
                selection: Color::rgb(0x3b, 0x6c, 0xff),
                window: Color::rgb(0x1a, 0x1a, 0x1a),
                panel: Color::rgb(0x12, 0x12, 0x12),
                widget_text: Color::rgb(0xff, 0xff, 0xff),
                highlight: Color::rgb(0x3b, 0x6c, 0xff),
            },
            ThemeMode::Light => Palette {
                background: Color::rgb(0xff, 0xff, 0xff),
                foreground: Color::rgb(0x00, 0x00, 0x00),
                selection: Color::rgb(0x2a, 0x62, 0xff),
                window: Color::rgb(0xf0, 0xf0, 0xf0),
                panel: Color::rgb(0xff, 0xff, 0xff),
                widget_text: Color::rgb(0x00, 0x00, 0x00),
                highlight: Color::rgb(0x2a, 0x62, 0xff),
            },
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(ThemeError::InvalidMode(other.to_string())),
        }
    }
}

/// Concrete colours for the editor surface and the surrounding widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub selection: Color,
    pub window: Color,
    pub panel: Color,
    pub widget_text: Color,
    pub highlight: Color,
}

/// Resolves the active [`Palette`] from the theme mode and sticky custom colours.
///
/// Custom background and foreground colours survive mode switches and override
/// the mode's defaults until they are reset.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    mode: ThemeMode,
    custom_background: Option<Color>,
    custom_foreground: Option<Color>,
    palette: Palette,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl ThemeManager {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            custom_background: None,
            custom_foreground: None,
            palette: mode.defaults(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn custom_background(&self) -> Option<Color> {
        self.custom_background
    }

    pub fn custom_foreground(&self) -> Option<Color> {
        self.custom_foreground
    }

    pub fn apply_theme(&mut self, mode: ThemeMode) -> &Palette {
        self.mode = mode;
        let mut palette = mode.defaults();
        if let Some(background) = self.custom_background {
            palette.background = background;
        }
        if let Some(foreground) = self.custom_foreground {
            palette.foreground = foreground;
        }
        debug!(?mode, background = %palette.background, foreground = %palette.foreground, "theme applied");
        self.palette = palette;
        &self.palette
    }

    /// Stores a validated custom background and re-applies the current mode.
    pub fn pick_background(&mut self, input: &str) -> Result<&Palette, ThemeError> {
        let color = Color::from_hex(input)?;
        self.custom_background = Some(color);
        Ok(self.apply_theme(self.mode))
    }

    /// Stores a validated custom foreground and re-applies the current mode.
    pub fn pick_foreground(&mut self, input: &str) -> Result<&Palette, ThemeError> {
        let color = Color::from_hex(input)?;
        self.custom_foreground = Some(color);
        Ok(self.apply_theme(self.mode))
    }

    pub fn reset_custom_colors(&mut self) -> &Palette {
        self.custom_background = None;
        self.custom_foreground = None;
        self.apply_theme(self.mode)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("invalid color {value}: {reason}")]
    InvalidColor {
        value: String,
        reason: ColorParseError,
    },
    #[error("invalid theme mode '{0}'")]
    InvalidMode(String),
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHashPrefix,
    #[error("color must contain 6 or 8 hexadecimal digits")]
    InvalidLength,
    #[error("color contains non-hexadecimal characters")]
    InvalidHex,
}

fn parse_hex(input: &str) -> Result<Color, ColorParseError> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix('#')
        .ok_or(ColorParseError::MissingHashPrefix)?;
    if !hex.is_ascii() {
        return Err(ColorParseError::InvalidHex);
    }
    if hex.len() != 6 && hex.len() != 8 {
        return Err(ColorParseError::InvalidLength);
    }
    let mut rgba = [0u8, 0, 0, 255];
    for (i, slot) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
        let start = i * 2;
        *slot = u8::from_str_radix(&hex[start..start + 2], 16)
            .map_err(|_| ColorParseError::InvalidHex)?;
    }
    Ok(Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    })
}
