use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tracing::debug;

/// 應用程式在作業系統中的識別碼。 / Identity the shell groups our windows and jump list under.
pub const APP_USER_MODEL_ID: &str = "com.blacknotepad.app";

/// 作業系統「最近使用的文件」登錄。只寫不讀，失敗時忽略。
/// The OS "recent documents" facility. Append-only and fire-and-forget: failures are ignored.
pub trait RecentDocuments {
    fn register_recent(&self, path: &Path);
}

/// 透過 Windows 殼層登錄（工作列跳躍清單）；其他平台僅記錄日誌。
/// Registers with the Windows shell (taskbar jump list); other platforms only log.
#[derive(Debug, Default)]
pub struct ShellRecentDocuments;

impl RecentDocuments for ShellRecentDocuments {
    fn register_recent(&self, path: &Path) {
        debug!(path = %path.display(), "registering recent document");
        shell::add_to_recent_docs(path);
    }
}

/// 記憶體中的僅附加清單。 / In-memory append-only log of registered paths.
#[derive(Debug, Default)]
pub struct RecentLog {
    entries: RefCell<Vec<PathBuf>>,
}

impl RecentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<PathBuf> {
        self.entries.borrow().clone()
    }
}

impl RecentDocuments for RecentLog {
    fn register_recent(&self, path: &Path) {
        self.entries.borrow_mut().push(path.to_path_buf());
    }
}

/// 設定程序的 AppUserModelID，讓工作列將視窗與跳躍清單歸在一起。
/// Tags the process with [`APP_USER_MODEL_ID`] so the taskbar groups windows and the jump list.
pub fn set_app_identity() {
    shell::set_app_user_model_id(APP_USER_MODEL_ID);
}

#[cfg(windows)]
mod shell {
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;

    use tracing::warn;
    use windows::core::PCWSTR;
    use windows::Win32::UI::Shell::{
        SHAddToRecentDocs, SetCurrentProcessExplicitAppUserModelID, SHARD_PATHW,
    };

    fn wide(value: &std::ffi::OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }

    pub fn add_to_recent_docs(path: &Path) {
        let wide_path = wide(path.as_os_str());
        // SAFETY: `wide_path` is NUL-terminated and outlives the call.
        unsafe {
            SHAddToRecentDocs(SHARD_PATHW.0 as u32, Some(wide_path.as_ptr().cast()));
        }
    }

    pub fn set_app_user_model_id(id: &str) {
        let wide_id = wide(std::ffi::OsStr::new(id));
        // SAFETY: `wide_id` is NUL-terminated and outlives the call.
        let result = unsafe { SetCurrentProcessExplicitAppUserModelID(PCWSTR(wide_id.as_ptr())) };
        if let Err(err) = result {
            warn!(%err, "failed to set AppUserModelID");
        }
    }
}

#[cfg(not(windows))]
mod shell {
    use std::path::Path;

    pub fn add_to_recent_docs(_path: &Path) {}

    pub fn set_app_user_model_id(_id: &str) {}
}
