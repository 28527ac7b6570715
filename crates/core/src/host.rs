use std::path::{Path, PathBuf};

/// 使用者對「是否儲存變更」提示的回答。 / Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// 阻斷式的訊息通知。 / Blocking notifications shown to the user.
pub trait Notify {
    fn report_error(&mut self, title: &str, message: &str);
    fn report_info(&mut self, title: &str, message: &str);
}

/// 文件工作階段需要的互動對話框。 / The modal interactions a document session needs from the UI.
///
/// Returning `None` from a path chooser means the user dismissed the dialog.
pub trait SessionHost: Notify {
    fn ask_save_changes(&mut self, document_name: &str) -> SaveChoice;
    fn choose_open_path(&mut self) -> Option<PathBuf>;
    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf>;
}
