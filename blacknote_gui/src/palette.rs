use std::fs;
use std::path::PathBuf;

use egui::{Color32, FontData, FontDefinitions, FontFamily, FontId, Stroke};
use tracing::debug;

use blacknote_settings::{Color, FontConfig, Palette, ThemeMode};

pub fn color32_from_color(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn color_from_color32(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color { r, g, b, a }
}

pub fn font_id(font: &FontConfig) -> FontId {
    let family = match font.family {
        blacknote_settings::FontFamily::Monospace => FontFamily::Monospace,
        blacknote_settings::FontFamily::Proportional => FontFamily::Proportional,
    };
    FontId::new(font.size, family)
}

/// Maps the resolved palette onto egui visuals for the whole window.
pub fn visuals_for(mode: ThemeMode, palette: &Palette) -> egui::Visuals {
    let mut visuals = match mode {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    };
    let widget_text = color32_from_color(palette.widget_text);
    let highlight = color32_from_color(palette.highlight);

    visuals.override_text_color = Some(widget_text);
    visuals.panel_fill = color32_from_color(palette.panel);
    visuals.window_fill = color32_from_color(palette.window);
    visuals.extreme_bg_color = color32_from_color(palette.background);
    visuals.faint_bg_color = color32_from_color(palette.window);
    visuals.selection.bg_fill = color32_from_color(palette.selection);
    visuals.selection.stroke = Stroke::new(1.0, color32_from_color(palette.foreground));
    visuals.hyperlink_color = highlight;
    visuals.widgets.inactive.fg_stroke.color = widget_text;
    visuals.widgets.hovered.bg_fill = highlight;
    visuals.widgets.hovered.weak_bg_fill = highlight;
    visuals.widgets.active.bg_fill = highlight;
    visuals.widgets.active.weak_bg_fill = highlight;
    visuals
}

/// Installs a CJK-capable fallback font when one is available on the system.
pub fn install_fonts(ctx: &egui::Context) {
    let mut definitions = FontDefinitions::default();
    if let Some((name, data)) = load_cjk_font() {
        definitions
            .font_data
            .insert(name.clone(), FontData::from_owned(data));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            if let Some(fonts) = definitions.families.get_mut(&family) {
                fonts.push(name.clone());
            }
        }
    }
    ctx.set_fonts(definitions);
}

fn load_cjk_font() -> Option<(String, Vec<u8>)> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "windows")]
    {
        candidates.push(PathBuf::from(r"C:\Windows\Fonts\malgun.ttf"));
        candidates.push(PathBuf::from(r"C:\Windows\Fonts\msjh.ttc"));
        candidates.push(PathBuf::from(r"C:\Windows\Fonts\msyh.ttc"));
    }

    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/System/Library/Fonts/AppleSDGothicNeo.ttc"));
        candidates.push(PathBuf::from("/System/Library/Fonts/PingFang.ttc"));
    }

    #[cfg(target_os = "linux")]
    {
        candidates.push(PathBuf::from(
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ));
        candidates.push(PathBuf::from(
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        ));
    }

    for path in candidates.into_iter().filter(|p| p.exists()) {
        if let Ok(bytes) = fs::read(&path) {
            debug!(path = %path.display(), "loaded fallback font");
            return Some(("cjk_fallback".into(), bytes));
        }
    }
    None
}

const ICON_SIZE: u32 = 32;

/// The window icon: a black page with a light frame and a few lines of text.
pub fn window_icon() -> egui::IconData {
    let frame = [0xE0, 0xE0, 0xE0, 0xFF];
    let page = [0x0B, 0x0B, 0x0B, 0xFF];
    let ink = [0x9A, 0x9A, 0x9A, 0xFF];
    let last = ICON_SIZE - 1;
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let pixel = if x < 2 || y < 2 || x >= last - 1 || y >= last - 1 {
                frame
            } else if y >= 8 && y % 5 == 3 && (6..=last - 6).contains(&x) {
                ink
            } else {
                page
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    egui::IconData {
        rgba,
        width: ICON_SIZE,
        height: ICON_SIZE,
    }
}
