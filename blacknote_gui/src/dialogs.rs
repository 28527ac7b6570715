use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use blacknote_core::{Notify, SaveChoice, SessionHost};

const TEXT_FILTER: (&str, &[&str]) = ("Text Files", &["txt"]);
const ALL_FILTER: (&str, &[&str]) = ("All Files", &["*"]);

/// Native modal dialogs backing the document session. Each call blocks the frame.
#[derive(Debug, Default)]
pub struct NativeDialogs;

impl Notify for NativeDialogs {
    fn report_error(&mut self, title: &str, message: &str) {
        show_message(MessageLevel::Error, title, message);
    }

    fn report_info(&mut self, title: &str, message: &str) {
        show_message(MessageLevel::Info, title, message);
    }
}

impl SessionHost for NativeDialogs {
    fn ask_save_changes(&mut self, document_name: &str) -> SaveChoice {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Save changes?")
            .set_description(format!("Save changes to '{document_name}'?"))
            .set_buttons(MessageButtons::YesNoCancel)
            .show();
        save_choice(answer)
    }

    fn choose_open_path(&mut self) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Open")
            .add_filter(TEXT_FILTER.0, TEXT_FILTER.1)
            .add_filter(ALL_FILTER.0, ALL_FILTER.1)
            .pick_file()
    }

    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Save As")
            .add_filter(TEXT_FILTER.0, TEXT_FILTER.1)
            .add_filter(ALL_FILTER.0, ALL_FILTER.1);
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = suggested.parent().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }
}

fn show_message(level: MessageLevel, title: &str, message: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn save_choice(answer: MessageDialogResult) -> SaveChoice {
    match answer {
        MessageDialogResult::Yes | MessageDialogResult::Ok => SaveChoice::Save,
        MessageDialogResult::No => SaveChoice::Discard,
        _ => SaveChoice::Cancel,
    }
}
