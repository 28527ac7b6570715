use egui::{Key, KeyboardShortcut, Modifiers};
use once_cell::sync::Lazy;
use tracing::debug;

use blacknote_settings::ThemeMode;

use crate::app::{ColorTarget, NotepadApp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Find,
    Replace,
    WordWrap,
    Font,
    InsertDateTime,
    LightTheme,
    DarkTheme,
    CustomBackground,
    CustomForeground,
    ResetColors,
    StatusBar,
    About,
}

/// Where a key chord is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    None,
    /// Consumed by the app and dispatched through the table.
    App(KeyboardShortcut),
    /// Shown in the menu; the text widget handles the chord itself.
    Editor(KeyboardShortcut),
}

impl Shortcut {
    pub fn chord(self) -> Option<KeyboardShortcut> {
        match self {
            Shortcut::None => None,
            Shortcut::App(chord) | Shortcut::Editor(chord) => Some(chord),
        }
    }
}

pub type Handler = fn(&mut NotepadApp, &egui::Context);
pub type CheckState = fn(&NotepadApp) -> bool;

pub struct CommandSpec {
    pub command: Command,
    pub label: &'static str,
    pub shortcut: Shortcut,
    pub handler: Handler,
    pub checked: Option<CheckState>,
}

impl CommandSpec {
    fn new(command: Command, label: &'static str, handler: Handler) -> Self {
        Self {
            command,
            label,
            shortcut: Shortcut::None,
            handler,
            checked: None,
        }
    }

    fn app_key(mut self, modifiers: Modifiers, key: Key) -> Self {
        self.shortcut = Shortcut::App(KeyboardShortcut::new(modifiers, key));
        self
    }

    fn editor_key(mut self, modifiers: Modifiers, key: Key) -> Self {
        self.shortcut = Shortcut::Editor(KeyboardShortcut::new(modifiers, key));
        self
    }

    fn check(mut self, checked: CheckState) -> Self {
        self.checked = Some(checked);
        self
    }
}

pub enum MenuEntry {
    Item(Command),
    Separator,
    Submenu(&'static str, &'static [MenuEntry]),
}

pub struct MenuSection {
    pub title: &'static str,
    pub entries: &'static [MenuEntry],
}

const CTRL: Modifiers = Modifiers::COMMAND;
const CTRL_SHIFT: Modifiers = Modifiers {
    alt: false,
    ctrl: false,
    shift: true,
    mac_cmd: false,
    command: true,
};

pub static COMMANDS: Lazy<Vec<CommandSpec>> = Lazy::new(|| {
    vec![
        CommandSpec::new(Command::New, "New", |app, _| app.new_document()).app_key(CTRL, Key::N),
        CommandSpec::new(Command::Open, "Open...", |app, _| app.open_document()).app_key(CTRL, Key::O),
        CommandSpec::new(Command::Save, "Save", |app, _| app.save_document()).app_key(CTRL, Key::S),
        CommandSpec::new(Command::SaveAs, "Save As...", |app, _| app.save_document_as())
            .app_key(CTRL_SHIFT, Key::S),
        CommandSpec::new(Command::Exit, "Exit", |app, ctx| app.request_exit(ctx)),
        CommandSpec::new(Command::Undo, "Undo", |app, ctx| app.undo(ctx)).editor_key(CTRL, Key::Z),
        CommandSpec::new(Command::Redo, "Redo", |app, ctx| app.redo(ctx)).editor_key(CTRL, Key::Y),
        CommandSpec::new(Command::Cut, "Cut", |app, ctx| app.cut(ctx)).editor_key(CTRL, Key::X),
        CommandSpec::new(Command::Copy, "Copy", |app, ctx| {
            app.copy(ctx);
        }).editor_key(CTRL, Key::C),
        CommandSpec::new(Command::Paste, "Paste", |app, _| app.paste()).editor_key(CTRL, Key::V),
        CommandSpec::new(Command::SelectAll, "Select All", |app, _| app.select_all())
            .editor_key(CTRL, Key::A),
        CommandSpec::new(Command::Find, "Find...", |app, _| app.open_find(false)).app_key(CTRL, Key::F),
        CommandSpec::new(Command::Replace, "Replace...", |app, _| app.open_find(true))
            .app_key(CTRL, Key::H),
        CommandSpec::new(Command::WordWrap, "Word Wrap", |app, _| app.toggle_word_wrap())
            .app_key(CTRL, Key::W)
            .check(|app| app.word_wrap()),
        CommandSpec::new(Command::Font, "Font...", |app, _| app.open_font_dialog()),
        CommandSpec::new(Command::InsertDateTime, "Insert Date/Time", |app, _| {
            app.insert_date_time()
        })
        .app_key(Modifiers::NONE, Key::F5),
        CommandSpec::new(Command::LightTheme, ThemeMode::Light.label(), |app, ctx| {
            app.set_theme(ctx, ThemeMode::Light)
        })
        .check(|app| app.theme_mode() == ThemeMode::Light),
        CommandSpec::new(Command::DarkTheme, ThemeMode::Dark.label(), |app, ctx| {
            app.set_theme(ctx, ThemeMode::Dark)
        })
        .check(|app| app.theme_mode() == ThemeMode::Dark),
        CommandSpec::new(Command::CustomBackground, "Custom Background...", |app, _| {
            app.open_color_dialog(ColorTarget::Background)
        }),
        CommandSpec::new(Command::CustomForeground, "Custom Foreground...", |app, _| {
            app.open_color_dialog(ColorTarget::Foreground)
        }),
        CommandSpec::new(Command::ResetColors, "Reset Custom Colors", |app, ctx| {
            app.reset_colors(ctx)
        }),
        CommandSpec::new(Command::StatusBar, "Status Bar", |app, _| app.toggle_status_bar())
            .check(|app| app.status_bar_visible()),
        CommandSpec::new(Command::About, "About", |app, _| app.show_about()),
    ]
});

pub static MENU_STRUCTURE: Lazy<Vec<MenuSection>> = Lazy::new(|| {
    use MenuEntry::{Item, Separator, Submenu};
    vec![
        MenuSection {
            title: "File",
            entries: &[
                Item(Command::New),
                Item(Command::Open),
                Separator,
                Item(Command::Save),
                Item(Command::SaveAs),
                Separator,
                Item(Command::Exit),
            ],
        },
        MenuSection {
            title: "Edit",
            entries: &[
                Item(Command::Undo),
                Item(Command::Redo),
                Separator,
                Item(Command::Cut),
                Item(Command::Copy),
                Item(Command::Paste),
                Separator,
                Item(Command::SelectAll),
                Separator,
                Item(Command::Find),
                Item(Command::Replace),
            ],
        },
        MenuSection {
            title: "Format",
            entries: &[
                Item(Command::WordWrap),
                Separator,
                Item(Command::Font),
                Item(Command::InsertDateTime),
            ],
        },
        MenuSection {
            title: "View",
            entries: &[
                Submenu(
                    "Theme / Colors",
                    &[
                        Item(Command::LightTheme),
                        Item(Command::DarkTheme),
                        Separator,
                        Item(Command::CustomBackground),
                        Item(Command::CustomForeground),
                        Item(Command::ResetColors),
                    ],
                ),
                Item(Command::StatusBar),
            ],
        },
        MenuSection {
            title: "Help",
            entries: &[Item(Command::About)],
        },
    ]
});

pub fn spec(command: Command) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.command == command)
}

pub fn dispatch(app: &mut NotepadApp, ctx: &egui::Context, command: Command) {
    let Some(handler) = spec(command).map(|spec| spec.handler) else {
        return;
    };
    debug!(?command, "dispatching command");
    handler(app, ctx);
}

/// Consumes app-level chords from this frame's input and dispatches them.
///
/// Chords with Shift are tried first so Ctrl+Shift+S is not taken by Ctrl+S.
pub fn handle_shortcuts(app: &mut NotepadApp, ctx: &egui::Context) {
    let app_chords = COMMANDS.iter().filter_map(|spec| match spec.shortcut {
        Shortcut::App(chord) => Some((spec.command, chord)),
        _ => None,
    });
    let (shifted, plain): (Vec<_>, Vec<_>) =
        app_chords.partition(|(_, chord)| chord.modifiers.shift);
    for (command, chord) in shifted.into_iter().chain(plain) {
        if ctx.input_mut(|input| input.consume_shortcut(&chord)) {
            dispatch(app, ctx, command);
        }
    }
}
