use std::path::PathBuf;

use chrono::Local;
use eframe::{App, Frame};
use egui::text::{CCursor, LayoutJob};
use egui::widgets::text_edit::CCursorRange;
use egui::{Align, Align2, Color32, FontId, Key, Layout, RichText, Sense, ViewportCommand};
use tracing::{debug, info, warn};

use blacknote_core::{FindReplace, SearchQuery, Session, TextSurface, APP_NAME};
use blacknote_settings::{clamp_font_size, FontConfig, FontFamily, ThemeManager, ThemeMode};

use crate::binding::{self, DocumentText};
use crate::chrome::{ChromeController, ChromeRequest, WindowState, CLOSE_ICON, MINIMIZE_ICON};
use crate::commands::{self, MenuEntry, MENU_STRUCTURE};
use crate::context::AppContext;
use crate::dialogs::NativeDialogs;
use crate::palette::{self, color32_from_color, color_from_color32};
use crate::status::StatusBarState;

const DATE_TIME_FORMAT: &str = "%H:%M %Y-%m-%d";
const ABOUT_TEXT: &str = "A plain-text notepad with dark and light themes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Background,
    Foreground,
}

impl ColorTarget {
    fn title(self) -> &'static str {
        match self {
            ColorTarget::Background => "Pick Background",
            ColorTarget::Foreground => "Pick Foreground",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FindAction {
    FindNext,
    Replace,
    ReplaceAll,
}

#[derive(Debug, Default)]
struct FindDialogState {
    open: bool,
    show_replace: bool,
    find: String,
    replace: String,
    case_sensitive: bool,
    whole_word: bool,
    focus_pending: bool,
}

impl FindDialogState {
    fn query(&self) -> SearchQuery {
        SearchQuery::new(self.find.clone())
            .with_replacement(self.replace.clone())
            .with_case_sensitive(self.case_sensitive)
            .with_whole_word(self.whole_word)
    }
}

#[derive(Debug)]
struct ColorDialogState {
    target: ColorTarget,
    color: Color32,
    hex: String,
    error: Option<String>,
}

pub struct NotepadApp {
    context: AppContext,
    session: Session,
    find_replace: FindReplace,
    themes: ThemeManager,
    chrome: ChromeController,
    font: FontConfig,
    word_wrap: bool,
    status_bar: bool,
    find_dialog: FindDialogState,
    color_dialog: Option<ColorDialogState>,
    font_dialog: Option<FontConfig>,
    about_open: bool,
    allow_close: bool,
    last_title: String,
    editor_id: egui::Id,
}

impl NotepadApp {
    pub fn new(cc: &eframe::CreationContext<'_>, context: AppContext, initial: Option<PathBuf>) -> Self {
        palette::install_fonts(&cc.egui_ctx);
        let config = context.config.clone();
        let mut app = Self {
            session: Session::new(context.fallback),
            find_replace: FindReplace::new(),
            themes: ThemeManager::new(config.theme),
            chrome: ChromeController::new(),
            font: config.font,
            word_wrap: config.word_wrap,
            status_bar: config.status_bar,
            find_dialog: FindDialogState::default(),
            color_dialog: None,
            font_dialog: None,
            about_open: false,
            allow_close: false,
            last_title: String::new(),
            editor_id: egui::Id::new("blacknote_editor"),
            context,
        };
        app.apply_palette(&cc.egui_ctx);
        if let Some(path) = initial {
            app.session
                .open_path(path, &mut NativeDialogs, &app.context.recent);
        }
        app
    }

    // ---- queries used by the command table ----

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    pub fn status_bar_visible(&self) -> bool {
        self.status_bar
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.themes.mode()
    }

    // ---- file ----

    pub fn new_document(&mut self) {
        self.session.new_document(&mut NativeDialogs, &self.context.recent);
    }

    pub fn open_document(&mut self) {
        self.session.open(&mut NativeDialogs, &self.context.recent);
    }

    pub fn save_document(&mut self) {
        self.session.save(&mut NativeDialogs, &self.context.recent);
    }

    pub fn save_document_as(&mut self) {
        self.session.save_as(&mut NativeDialogs, &self.context.recent);
    }

    /// Routes through the viewport so the menu, the title bar and the OS share one close guard.
    pub fn request_exit(&mut self, ctx: &egui::Context) {
        self.apply_chrome(ctx, ChromeRequest::Close);
    }

    // ---- edit ----

    pub fn undo(&mut self, ctx: &egui::Context) {
        self.step_history(ctx, false);
    }

    pub fn redo(&mut self, ctx: &egui::Context) {
        self.step_history(ctx, true);
    }

    fn step_history(&mut self, ctx: &egui::Context, forward: bool) {
        self.reset_history_if_replaced(ctx);
        let Some(mut state) = egui::TextEdit::load_state(ctx, self.editor_id) else {
            return;
        };
        let mut undoer = state.undoer();
        let current = (
            state
                .ccursor_range()
                .unwrap_or_else(|| CCursorRange::one(CCursor::new(0))),
            self.session.buffer().text().to_string(),
        );
        let restored = if forward {
            undoer.redo(&current).cloned()
        } else {
            undoer.undo(&current).cloned()
        };
        state.set_undoer(undoer);
        state.store(ctx, self.editor_id);

        if let Some((range, text)) = restored {
            let buffer = self.session.buffer_mut();
            buffer.set_text(&text);
            buffer.set_char_selection(range.secondary.index, range.primary.index);
        }
    }

    pub fn cut(&mut self, ctx: &egui::Context) {
        if self.copy(ctx) {
            self.session.buffer_mut().insert_text("");
        }
    }

    pub fn copy(&mut self, ctx: &egui::Context) -> bool {
        let Some(selected) = self.session.buffer().selected_text().map(str::to_string) else {
            return false;
        };
        ctx.output_mut(|output| output.copied_text = selected);
        true
    }

    pub fn paste(&mut self) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(clip) => {
                if binding::paste_into(self.session.buffer_mut(), &clip) {
                    debug!(chars = clip.chars().count(), "pasted from clipboard");
                }
            }
            Err(err) => warn!(%err, "clipboard read failed"),
        }
    }

    pub fn select_all(&mut self) {
        let buffer = self.session.buffer_mut();
        let len = buffer.len();
        buffer.select(0..len);
    }

    /// Opens the find dialog seeded with the current selection.
    pub fn open_find(&mut self, show_replace: bool) {
        if let Some(selected) = self.session.buffer().selected_text() {
            self.find_dialog.find = selected.to_string();
        }
        self.find_dialog.open = true;
        self.find_dialog.show_replace = show_replace;
        self.find_dialog.focus_pending = true;
    }

    pub fn insert_date_time(&mut self) {
        let stamp = Local::now().format(DATE_TIME_FORMAT).to_string();
        self.session.buffer_mut().insert_text(&stamp);
    }

    // ---- format / view ----

    pub fn toggle_word_wrap(&mut self) {
        self.word_wrap = !self.word_wrap;
        debug!(word_wrap = self.word_wrap, "word wrap toggled");
    }

    pub fn open_font_dialog(&mut self) {
        self.font_dialog = Some(self.font);
    }

    pub fn toggle_status_bar(&mut self) {
        self.status_bar = !self.status_bar;
    }

    pub fn set_theme(&mut self, ctx: &egui::Context, mode: ThemeMode) {
        self.themes.apply_theme(mode);
        self.apply_palette(ctx);
        info!(?mode, "theme switched");
    }

    pub fn open_color_dialog(&mut self, target: ColorTarget) {
        let palette = self.themes.palette();
        let current = match target {
            ColorTarget::Background => self
                .themes
                .custom_background()
                .unwrap_or(palette.background),
            ColorTarget::Foreground => self
                .themes
                .custom_foreground()
                .unwrap_or(palette.foreground),
        };
        self.color_dialog = Some(ColorDialogState {
            target,
            color: color32_from_color(current),
            hex: current.to_hex(),
            error: None,
        });
    }

    pub fn reset_colors(&mut self, ctx: &egui::Context) {
        self.themes.reset_custom_colors();
        self.apply_palette(ctx);
    }

    pub fn show_about(&mut self) {
        self.about_open = true;
    }

    fn apply_palette(&self, ctx: &egui::Context) {
        ctx.set_visuals(palette::visuals_for(self.themes.mode(), self.themes.palette()));
    }

    fn apply_chrome(&mut self, ctx: &egui::Context, request: ChromeRequest) {
        let command = match request {
            ChromeRequest::Minimize => ViewportCommand::Minimized(true),
            ChromeRequest::Maximize => ViewportCommand::Maximized(true),
            ChromeRequest::Restore => ViewportCommand::Maximized(false),
            ChromeRequest::StartDrag => ViewportCommand::StartDrag,
            ChromeRequest::Close => ViewportCommand::Close,
        };
        ctx.send_viewport_cmd(command);
    }

    fn run_find_action(&mut self, action: FindAction) {
        let query = self.find_dialog.query();
        let buffer = self.session.buffer_mut();
        let mut dialogs = NativeDialogs;
        match action {
            FindAction::FindNext => {
                self.find_replace.find_next(buffer, &query, &mut dialogs);
            }
            FindAction::Replace => {
                self.find_replace.replace_one(buffer, &query, &mut dialogs);
            }
            FindAction::ReplaceAll => {
                self.find_replace.replace_all(buffer, &query, &mut dialogs);
            }
        }
    }

    // ---- frame ----

    fn sync_viewport(&mut self, ctx: &egui::Context) {
        let maximized = ctx.input(|input| input.viewport().maximized.unwrap_or(false));
        self.chrome.sync(maximized);

        let title = self.session.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }

        if ctx.input(|input| input.viewport().close_requested()) && !self.allow_close {
            if self
                .session
                .request_close(&mut NativeDialogs, &self.context.recent)
            {
                self.allow_close = true;
            } else {
                debug!("close cancelled");
                ctx.send_viewport_cmd(ViewportCommand::CancelClose);
            }
        }
    }

    fn show_title_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.label(RichText::new("■").strong());
                for section in MENU_STRUCTURE.iter() {
                    ui.menu_button(section.title, |ui| {
                        self.render_menu_entries(ctx, ui, section.entries);
                    });
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button(CLOSE_ICON).on_hover_text("Close").clicked() {
                        self.apply_chrome(ctx, ChromeRequest::Close);
                    }
                    let max_hint = match self.chrome.state() {
                        WindowState::Normal => "Maximize",
                        WindowState::Maximized => "Restore",
                    };
                    if ui
                        .button(self.chrome.max_icon())
                        .on_hover_text(max_hint)
                        .clicked()
                    {
                        let request = self.chrome.toggle_maximize();
                        self.apply_chrome(ctx, request);
                    }
                    if ui.button(MINIMIZE_ICON).on_hover_text("Minimize").clicked() {
                        self.apply_chrome(ctx, ChromeRequest::Minimize);
                    }

                    let (rect, response) =
                        ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        &self.last_title,
                        FontId::proportional(13.0),
                        ui.visuals().text_color(),
                    );
                    self.handle_title_drag(ctx, &response);
                });
            });
        });
    }

    fn handle_title_drag(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if response.double_clicked() {
            let request = self.chrome.double_click();
            self.apply_chrome(ctx, request);
            return;
        }
        if response.drag_started() {
            if let Some(request) = self.chrome.press() {
                self.apply_chrome(ctx, request);
            }
        }
        if response.drag_released() || !ctx.input(|input| input.pointer.primary_down()) {
            self.chrome.release();
        }
    }

    fn render_menu_entries(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, entries: &[MenuEntry]) {
        for entry in entries {
            match entry {
                MenuEntry::Separator => {
                    ui.separator();
                }
                MenuEntry::Submenu(title, children) => {
                    ui.menu_button(*title, |ui| self.render_menu_entries(ctx, ui, children));
                }
                MenuEntry::Item(command) => {
                    let Some(spec) = commands::spec(*command) else {
                        continue;
                    };
                    let label = match spec.checked {
                        Some(checked) if checked(self) => format!("✔ {}", spec.label),
                        _ => spec.label.to_string(),
                    };
                    let mut button = egui::Button::new(label);
                    if let Some(chord) = spec.shortcut.chord() {
                        button = button.shortcut_text(ctx.format_shortcut(&chord));
                    }
                    if ui.add(button).clicked() {
                        ui.close_menu();
                        commands::dispatch(self, ctx, *command);
                    }
                }
            }
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        if !self.status_bar {
            return;
        }
        let status = StatusBarState::from_session(&self.session, self.word_wrap);
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(status.position_text());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(status.document_text());
                });
            });
        });
    }

    /// Drops the widget's undo stack once a different document has been loaded.
    fn reset_history_if_replaced(&mut self, ctx: &egui::Context) {
        if self.session.buffer_mut().take_replaced() {
            binding::reset_history(ctx, self.editor_id);
        }
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        let palette = *self.themes.palette();
        let font = palette::font_id(&self.font);
        let text_color = color32_from_color(palette.foreground);
        let wrap = self.word_wrap;
        let editor_id = self.editor_id;

        self.reset_history_if_replaced(ctx);
        if let Some((anchor, cursor)) = self.session.buffer_mut().take_selection_change() {
            let mut state = egui::TextEdit::load_state(ctx, editor_id).unwrap_or_default();
            state.set_ccursor_range(Some(CCursorRange::two(
                CCursor::new(anchor),
                CCursor::new(cursor),
            )));
            state.store(ctx, editor_id);
            ctx.memory_mut(|memory| memory.request_focus(editor_id));
        }

        let frame = egui::Frame::none()
            .fill(color32_from_color(palette.background))
            .inner_margin(4.0);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
                let width = if wrap { wrap_width } else { f32::INFINITY };
                let job = LayoutJob::simple(text.to_owned(), font.clone(), text_color, width);
                ui.fonts(|fonts| fonts.layout_job(job))
            };
            let scroll = if wrap {
                egui::ScrollArea::vertical()
            } else {
                egui::ScrollArea::both()
            };
            let buffer = self.session.buffer_mut();
            let output = scroll.auto_shrink([false, false]).show(ui, |ui| {
                egui::TextEdit::multiline(&mut DocumentText(&mut *buffer))
                    .id(editor_id)
                    .frame(false)
                    .lock_focus(true)
                    .desired_width(f32::INFINITY)
                    .min_size(ui.available_size())
                    .layouter(&mut layouter)
                    .show(ui)
            });
            if let Some(range) = output.inner.cursor_range {
                buffer.set_char_selection(range.secondary.ccursor.index, range.primary.ccursor.index);
            }
        });
    }

    fn show_find_window(&mut self, ctx: &egui::Context) {
        if !self.find_dialog.open {
            return;
        }
        let mut open = true;
        let mut action = None;
        let dialog = &mut self.find_dialog;
        let title = if dialog.show_replace { "Replace" } else { "Find" };
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("find_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Find what:");
                    let response = ui.text_edit_singleline(&mut dialog.find);
                    if std::mem::take(&mut dialog.focus_pending) {
                        response.request_focus();
                    }
                    if response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                        action = Some(FindAction::FindNext);
                    }
                    ui.end_row();
                    if dialog.show_replace {
                        ui.label("Replace with:");
                        ui.text_edit_singleline(&mut dialog.replace);
                        ui.end_row();
                    }
                });
                ui.checkbox(&mut dialog.case_sensitive, "Match case");
                ui.checkbox(&mut dialog.whole_word, "Whole word");
                ui.horizontal(|ui| {
                    if ui.button("Find Next").clicked() {
                        action = Some(FindAction::FindNext);
                    }
                    if dialog.show_replace {
                        if ui.button("Replace").clicked() {
                            action = Some(FindAction::Replace);
                        }
                        if ui.button("Replace All").clicked() {
                            action = Some(FindAction::ReplaceAll);
                        }
                    }
                });
            });
        self.find_dialog.open = open;
        if let Some(action) = action {
            self.run_find_action(action);
        }
    }

    fn show_color_window(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.color_dialog.as_mut() else {
            return;
        };
        let mut open = true;
        let mut apply = false;
        egui::Window::new(dialog.target.title())
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut dialog.color,
                        egui::color_picker::Alpha::Opaque,
                    )
                    .changed()
                    {
                        dialog.hex = color_from_color32(dialog.color).to_hex();
                        dialog.error = None;
                    }
                    ui.text_edit_singleline(&mut dialog.hex);
                });
                if let Some(error) = &dialog.error {
                    ui.colored_label(ui.visuals().error_fg_color, error.as_str());
                }
                if ui.button("Apply").clicked() {
                    apply = true;
                }
            });

        if apply {
            let result = match dialog.target {
                ColorTarget::Background => self.themes.pick_background(&dialog.hex),
                ColorTarget::Foreground => self.themes.pick_foreground(&dialog.hex),
            }
            .map(|_| ());
            match result {
                Ok(_) => {
                    open = false;
                    self.apply_palette(ctx);
                }
                Err(err) => dialog.error = Some(err.to_string()),
            }
        }
        if !open {
            self.color_dialog = None;
        }
    }

    fn show_font_window(&mut self, ctx: &egui::Context) {
        let Some(draft) = self.font_dialog.as_mut() else {
            return;
        };
        let mut open = true;
        let mut accepted = false;
        let mut cancelled = false;
        egui::Window::new("Choose Font")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ComboBox::from_label("Family")
                    .selected_text(draft.family.label())
                    .show_ui(ui, |ui| {
                        for family in FontFamily::ALL {
                            ui.selectable_value(&mut draft.family, family, family.label());
                        }
                    });
                ui.add(egui::Slider::new(&mut draft.size, 6.0..=72.0).text("Size"));
                ui.label(RichText::new("AaBbYyZz 가나다 123").font(palette::font_id(draft)));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        accepted = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });
        if cancelled {
            open = false;
        }

        if accepted {
            self.font = FontConfig {
                family: draft.family,
                size: clamp_font_size(draft.size),
            };
            debug!(family = self.font.family.label(), size = self.font.size, "font changed");
            open = false;
        }
        if !open {
            self.font_dialog = None;
        }
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        if !self.about_open {
            return;
        }
        let mut open = true;
        egui::Window::new(format!("About {APP_NAME}"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(APP_NAME);
                ui.label(ABOUT_TEXT);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            });
        self.about_open = open;
    }
}

impl App for NotepadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        commands::handle_shortcuts(self, ctx);
        self.sync_viewport(ctx);

        self.show_title_bar(ctx);
        self.show_status_bar(ctx);
        self.show_editor(ctx);
        self.show_find_window(ctx);
        self.show_color_window(ctx);
        self.show_font_window(ctx);
        self.show_about_window(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.shutdown();
    }
}
