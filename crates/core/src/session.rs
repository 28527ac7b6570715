use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::{self, LegacyFallback, LineEnding, TextEncoding};
use crate::editor::{EditorBuffer, TextSurface};
use crate::host::{SaveChoice, SessionHost};
use crate::recent::RecentDocuments;

pub const APP_NAME: &str = "Black Notepad";
const UNTITLED: &str = "Untitled";
const UNTITLED_FILE: &str = "Untitled.txt";

/// 目前開啟檔案的路徑與修改狀態。 / The currently open file: its path, text and modification state.
///
/// The dirty flag lives on the buffer so that every text mutation sets it. It is
/// cleared only by a successful load or save.
#[derive(Debug, Default)]
pub struct Session {
    path: Option<PathBuf>,
    buffer: EditorBuffer,
    encoding: TextEncoding,
    line_ending: LineEnding,
    fallback: LegacyFallback,
}

impl Session {
    /// 建立未命名的空白工作階段。 / Creates an empty, untitled session.
    pub fn new(fallback: LegacyFallback) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditorBuffer {
        &mut self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// 檔名，未儲存時為 "Untitled"。 / File name, or "Untitled" before the first save.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    pub fn window_title(&self) -> String {
        let dirty = if self.is_dirty() { "*" } else { "" };
        format!("{}{dirty} - {APP_NAME}", self.display_name())
    }

    /// 未儲存變更的防護：回傳 `true` 代表可以繼續破壞性操作。
    /// Unsaved-changes guard. Returns `true` when a destructive action may proceed.
    pub fn confirm_discard(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        if !self.is_dirty() {
            return true;
        }
        match host.ask_save_changes(&self.display_name()) {
            SaveChoice::Save => self.save(host, recent),
            SaveChoice::Discard => true,
            SaveChoice::Cancel => false,
        }
    }

    pub fn new_document(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        if !self.confirm_discard(host, recent) {
            return false;
        }
        self.buffer.replace_document("");
        self.path = None;
        self.encoding = TextEncoding::Utf8;
        self.line_ending = LineEnding::Lf;
        info!("started new document");
        true
    }

    /// 詢問路徑後開啟檔案。 / Asks for a file and opens it.
    pub fn open(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        if !self.confirm_discard(host, recent) {
            return false;
        }
        match host.choose_open_path() {
            Some(path) => self.load(path, host, recent),
            None => false,
        }
    }

    pub fn open_path(
        &mut self,
        path: impl Into<PathBuf>,
        host: &mut dyn SessionHost,
        recent: &dyn RecentDocuments,
    ) -> bool {
        if !self.confirm_discard(host, recent) {
            return false;
        }
        self.load(path.into(), host, recent)
    }

    pub fn save(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        match self.path.clone() {
            Some(path) => self.write(&path, host, recent),
            None => self.save_as(host, recent),
        }
    }

    /// 另存新檔；只有寫入成功才會更新路徑。 / Save As. The path is committed only once the write succeeds.
    pub fn save_as(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        let suggested = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(UNTITLED_FILE));
        let Some(path) = host.choose_save_path(&suggested) else {
            return false;
        };
        if !self.write(&path, host, recent) {
            return false;
        }
        self.path = Some(path);
        true
    }

    /// 以 UTF-8 寫入；失敗時回報錯誤且不改變狀態。 / Writes UTF-8; on failure reports it and leaves state untouched.
    pub fn write(&mut self, path: &Path, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        let text = match self.line_ending {
            LineEnding::Lf => self.buffer.text().to_string(),
            ending => self.buffer.text().replace('\n', ending.as_str()),
        };
        if let Err(err) = document::write_text(path, &text) {
            warn!(%err, "save failed");
            host.report_error("Save Error", &err.to_string());
            return false;
        }
        self.buffer.set_modified(false);
        self.encoding = TextEncoding::Utf8;
        recent.register_recent(path);
        info!(path = %path.display(), bytes = text.len(), "saved document");
        true
    }

    /// 關閉視窗前的防護。 / The guard applied to a window close request.
    pub fn request_close(&mut self, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        self.confirm_discard(host, recent)
    }

    fn load(&mut self, path: PathBuf, host: &mut dyn SessionHost, recent: &dyn RecentDocuments) -> bool {
        let decoded = match document::read_text(&path, self.fallback) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(%err, "open failed");
                host.report_error("Open Error", &err.to_string());
                return false;
            }
        };
        self.line_ending = document::detect_line_ending(&decoded.text);
        self.buffer
            .replace_document(&document::normalize_newlines(&decoded.text));
        self.encoding = decoded.encoding;
        info!(
            path = %path.display(),
            encoding = decoded.encoding.name(),
            lossy = decoded.lossy,
            "opened document"
        );
        recent.register_recent(&path);
        self.path = Some(path);
        true
    }
}
