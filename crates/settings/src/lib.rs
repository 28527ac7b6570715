pub mod config;
pub mod theme;

pub use config::{clamp_font_size, AppConfig, FontConfig, FontFamily};
pub use theme::{Color, ColorParseError, Palette, ThemeError, ThemeManager, ThemeMode};
