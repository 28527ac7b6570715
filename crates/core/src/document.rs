use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding as RsEncoding, EUC_KR};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// 表示文件目前使用的行尾樣式。 / Represents the line ending style detected in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// 回傳序列化文字時使用的行尾字串。 / Returns the literal used when serialising text.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// 狀態列顯示用的名稱。 / Short label shown in the status bar.
    pub fn label(self) -> &'static str {
        match self {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
            LineEnding::Cr => "CR",
        }
    }
}

/// 讀取檔案時實際採用的編碼。 / Codec that was actually used to decode a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Legacy(&'static RsEncoding),
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Legacy(encoding) => encoding.name(),
        }
    }
}

/// UTF-8 解碼失敗時的後備編碼策略。 / Strategy for the second, lossy decoding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFallback {
    /// 固定使用指定的舊式編碼。 / Always decode with the given legacy codec.
    Fixed(&'static RsEncoding),
    /// 以 chardetng 推測舊式編碼（排除 UTF-8）。 / Guess the legacy codec with chardetng, UTF-8 excluded.
    Detect,
}

impl Default for LegacyFallback {
    fn default() -> Self {
        LegacyFallback::Fixed(EUC_KR)
    }
}

impl LegacyFallback {
    /// 由編碼標籤建立策略；`auto` 代表自動偵測。 / Parses an encoding label, `auto` selects detection.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("auto") {
            return Some(LegacyFallback::Detect);
        }
        RsEncoding::for_label(label.as_bytes()).map(LegacyFallback::Fixed)
    }

    fn resolve(self, bytes: &[u8]) -> &'static RsEncoding {
        match self {
            LegacyFallback::Fixed(encoding) => encoding,
            LegacyFallback::Detect => {
                let mut detector = EncodingDetector::new();
                detector.feed(bytes, true);
                detector.guess(None, false)
            }
        }
    }
}

/// 讀寫文字檔時可能發生的錯誤。 / Errors raised while reading or writing a text file.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// 解碼結果與所用編碼。 / Decoded file contents plus the codec that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
    pub had_bom: bool,
    /// 舊式解碼時是否出現替代字元。 / Whether the legacy pass substituted U+FFFD.
    pub lossy: bool,
}

/// 讀取整個檔案：先嚴格 UTF-8，失敗時改以舊式編碼寬鬆解碼，不會因編碼而失敗。
/// Reads a whole file: strict UTF-8 first, then a lossy legacy decode. Decoding never fails.
pub fn read_text(path: impl AsRef<Path>, fallback: LegacyFallback) -> Result<DecodedText, DocumentError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_bytes(&bytes, fallback))
}

/// 以 UTF-8（無 BOM）寫入整個檔案。 / Writes the whole text as UTF-8 without a BOM.
///
/// Symlinks are written through to their target. When the target's directory does not
/// accept new files the existing file is overwritten in place.
pub fn write_text(path: impl AsRef<Path>, text: &str) -> Result<(), DocumentError> {
    let path = path.as_ref();
    let to_error = |source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match NamedTempFile::new_in(dir) {
        Ok(tmp) => replace_atomically(tmp, &target, text).map_err(to_error),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied && target.is_file() => {
            debug!(path = %target.display(), "directory not writable, saving in place");
            write_in_place(&target, text).map_err(to_error)
        }
        Err(err) => Err(to_error(err)),
    }
}

// 暫存檔寫完才取代原檔，失敗時暫存檔自動刪除。 / The target is only replaced once the temp file is complete.
fn replace_atomically(mut tmp: NamedTempFile, target: &Path, text: &str) -> io::Result<()> {
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(target) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}

fn write_in_place(target: &Path, text: &str) -> io::Result<()> {
    let mut file = File::create(target)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}

pub fn decode_bytes(bytes: &[u8], fallback: LegacyFallback) -> DecodedText {
    let (payload, had_bom) = match bytes.strip_prefix(b"\xEF\xBB\xBF") {
        Some(rest) => (rest, true),
        None => (bytes, false),
    };

    if let Ok(text) = std::str::from_utf8(payload) {
        return DecodedText {
            text: text.to_owned(),
            encoding: TextEncoding::Utf8,
            had_bom,
            lossy: false,
        };
    }

    let encoding = fallback.resolve(payload);
    let (text, lossy) = encoding.decode_without_bom_handling(payload);
    debug!(codec = encoding.name(), lossy, "utf-8 decode failed, used legacy codec");
    DecodedText {
        text: text.into_owned(),
        encoding: TextEncoding::Legacy(encoding),
        had_bom: false,
        lossy,
    }
}

/// 掃描第一個換行記號以推斷行尾偏好。 / Scans for the first newline sentinel to infer the line ending.
pub fn detect_line_ending(text: &str) -> LineEnding {
    let bytes = text.as_bytes();
    match bytes.iter().position(|b| *b == b'\r' || *b == b'\n') {
        Some(idx) if bytes[idx] == b'\n' => LineEnding::Lf,
        Some(idx) if bytes.get(idx + 1) == Some(&b'\n') => LineEnding::CrLf,
        Some(_) => LineEnding::Cr,
        None => LineEnding::Lf,
    }
}

/// 將 CRLF 與 CR 轉成 LF。 / Converts CRLF and lone CR sequences to LF.
pub fn normalize_newlines(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{GBK, WINDOWS_1252};

    #[test]
    fn write_then_read_round_trips_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");
        let text = "plain ascii\n한국어 텍스트\r\nemoji 🦀\n";

        write_text(&path, text).unwrap();
        let decoded = read_text(&path, LegacyFallback::default()).unwrap();
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert!(!decoded.lossy);
    }

    #[test]
    fn write_does_not_leave_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.txt");
        write_text(&path, "x").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("clean.txt")]);
    }

    #[test]
    fn read_strips_utf8_bom() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFhello", LegacyFallback::default());
        assert_eq!(decoded.text, "hello");
        assert!(decoded.had_bom);
    }

    #[test]
    fn bom_is_not_decoded_by_the_legacy_pass() {
        let (encoded, _, _) = EUC_KR.encode("안녕");
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(&encoded);
        let decoded = decode_bytes(&bytes, LegacyFallback::default());
        assert_eq!(decoded.text, "안녕");
        assert_eq!(decoded.encoding, TextEncoding::Legacy(EUC_KR));
    }

    #[test]
    fn write_leaves_similarly_named_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let neighbour = dir.path().join("note.txt.blacknote-tmp");
        fs::write(&neighbour, "unrelated").unwrap();

        write_text(&path, "saved").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "saved");
        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "unrelated");
    }

    #[cfg(unix)]
    #[test]
    fn write_through_symlink_keeps_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&target, "old").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        write_text(&link, "new").unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn write_succeeds_when_directory_is_read_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        fs::write(&path, "before").unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let result = write_text(&path, "after");
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
        result.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "after");
    }

    #[test]
    fn invalid_utf8_falls_back_to_fixed_legacy_codec() {
        let (encoded, _, _) = EUC_KR.encode("안녕하세요");
        let decoded = decode_bytes(&encoded, LegacyFallback::default());
        assert_eq!(decoded.text, "안녕하세요");
        assert_eq!(decoded.encoding, TextEncoding::Legacy(EUC_KR));
        assert!(!decoded.lossy);
    }

    #[test]
    fn legacy_decode_substitutes_replacement_characters() {
        // 0xFF 不是合法的 EUC-KR 前導位元組。 / 0xFF is not a valid EUC-KR lead byte.
        let decoded = decode_bytes(&[b'o', b'k', 0xFF], LegacyFallback::default());
        assert!(decoded.text.starts_with("ok"));
        assert!(decoded.text.contains('\u{FFFD}'));
        assert!(decoded.lossy);
    }

    #[test]
    fn detect_fallback_guesses_legacy_codec() {
        let (encoded, _, _) = GBK.encode("中文測試");
        let decoded = decode_bytes(&encoded, LegacyFallback::Detect);
        assert_eq!(decoded.text, "中文測試");
        assert!(matches!(decoded.encoding, TextEncoding::Legacy(_)));
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(dir.path().join("missing.txt"), LegacyFallback::default()).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");
        let err = write_text(&path, "data").unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn fallback_labels_parse() {
        assert_eq!(LegacyFallback::from_label("auto"), Some(LegacyFallback::Detect));
        assert_eq!(
            LegacyFallback::from_label("windows-1252"),
            Some(LegacyFallback::Fixed(WINDOWS_1252))
        );
        assert_eq!(LegacyFallback::from_label("no-such-codec"), None);
    }

    #[test]
    fn line_endings_are_detected_and_normalised() {
        assert_eq!(detect_line_ending("a\r\nb"), LineEnding::CrLf);
        assert_eq!(detect_line_ending("a\rb"), LineEnding::Cr);
        assert_eq!(detect_line_ending("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(detect_line_ending("single"), LineEnding::Lf);
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
