use std::ops::Range;

use blacknote_search::{Matcher, SearchQuery};

/// 核心所需的編輯區介面：游標、選取、搜尋與文字替換。
/// What the core consumes from the toolkit's editing surface: cursor, selection, find and text mutation.
///
/// All offsets are byte offsets into [`TextSurface::text`] and always sit on char boundaries.
pub trait TextSurface {
    fn text(&self) -> &str;

    /// 游標（選取的活動端）。 / The caret, i.e. the active end of any selection.
    fn cursor(&self) -> usize;

    /// 選取的固定端；無選取時等於游標。 / The fixed end of the selection, equal to the cursor when nothing is selected.
    fn anchor(&self) -> usize;

    /// 移動游標並清除選取。 / Moves the caret and clears the selection.
    fn set_cursor(&mut self, position: usize);

    fn set_selection(&mut self, anchor: usize, cursor: usize);

    /// 以給定文字取代選取（或在游標處插入），游標移至插入文字之後。
    /// Replaces the selection (or inserts at the caret) and leaves the caret after the inserted text.
    fn insert_text(&mut self, text: &str);

    /// 整份取代內容，游標回到開頭。 / Replaces the whole content and moves the caret to the start.
    fn set_text(&mut self, text: &str);

    fn is_modified(&self) -> bool;

    fn set_modified(&mut self, modified: bool);

    fn selection(&self) -> Option<Range<usize>> {
        let (anchor, cursor) = (self.anchor(), self.cursor());
        if anchor == cursor {
            None
        } else {
            Some(anchor.min(cursor)..anchor.max(cursor))
        }
    }

    fn select(&mut self, range: Range<usize>) {
        self.set_selection(range.start, range.end);
    }

    fn selected_text(&self) -> Option<&str> {
        self.selection().map(|range| &self.text()[range])
    }

    /// 從選取結尾（或游標）往後搜尋，不繞回；找到時選取該段並將游標置於結尾。
    /// Searches forward from the end of the selection (or the caret) without wrapping;
    /// a hit is selected with the caret at its end.
    fn find(&mut self, query: &SearchQuery) -> bool {
        let Ok(matcher) = Matcher::new(query) else {
            return false;
        };
        let start = self.selection().map_or(self.cursor(), |range| range.end);
        match matcher.find_from(self.text(), start) {
            Some(range) => {
                self.select(range);
                true
            }
            None => false,
        }
    }
}

/// 綁定到 GUI 文字元件的純文字緩衝。 / Plain-text buffer the GUI text widget is bound to.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    text: String,
    cursor: usize,
    anchor: usize,
    modified: bool,
    selection_moved: bool,
    replaced: bool,
}

impl EditorBuffer {
    /// 建立內容為 `text` 且未修改的緩衝區。 / Creates an unmodified buffer holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 於字元索引插入文字，回傳插入的字元數。 / Inserts at a char index, returning the number of chars inserted.
    pub fn insert_at_char(&mut self, char_index: usize, text: &str) -> usize {
        let at = self.byte_index(char_index);
        self.text.insert_str(at, text);
        self.modified = true;
        self.clamp_carets();
        text.chars().count()
    }

    /// 刪除字元索引範圍。 / Deletes a range given in char indices.
    pub fn delete_char_range(&mut self, chars: Range<usize>) {
        let start = self.byte_index(chars.start);
        let end = self.byte_index(chars.end);
        if start >= end {
            return;
        }
        self.text.replace_range(start..end, "");
        self.modified = true;
        self.clamp_carets();
    }

    /// 以字元索引回報選取 `(anchor, cursor)`，供 GUI 元件同步。 / Selection as `(anchor, cursor)` char indices for the widget.
    pub fn char_selection(&self) -> (usize, usize) {
        (self.char_index(self.anchor), self.char_index(self.cursor))
    }

    /// 由 GUI 元件回寫選取（字元索引）。 / Writes back the widget's selection, given in char indices.
    pub fn set_char_selection(&mut self, anchor: usize, cursor: usize) {
        self.anchor = self.byte_index(anchor);
        self.cursor = self.byte_index(cursor);
    }

    /// 取出自上次同步後由核心移動的選取。 / Takes the selection if the core moved it since the last sync.
    pub fn take_selection_change(&mut self) -> Option<(usize, usize)> {
        if std::mem::take(&mut self.selection_moved) {
            Some(self.char_selection())
        } else {
            None
        }
    }

    /// 載入新文件：取代全部內容、清除修改狀態，並標記編輯歷史需重設。
    /// Loads a different document: the content is replaced, the buffer is clean and
    /// the widget's edit history is flagged for reset.
    pub fn replace_document(&mut self, text: &str) {
        self.set_text(text);
        self.modified = false;
        self.replaced = true;
    }

    /// 取出自上次同步後是否換過文件。 / Takes whether a different document was loaded since the last sync.
    pub fn take_replaced(&mut self) -> bool {
        std::mem::take(&mut self.replaced)
    }

    /// 1 起算的行與欄。 / One-based line and column of a byte offset.
    pub fn line_column(&self, position: usize) -> (usize, usize) {
        let position = self.floor_boundary(position);
        let before = &self.text[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn char_index(&self, byte_index: usize) -> usize {
        self.text[..self.floor_boundary(byte_index)].chars().count()
    }

    fn floor_boundary(&self, index: usize) -> usize {
        let mut index = index.min(self.text.len());
        while !self.text.is_char_boundary(index) {
            index -= 1;
        }
        index
    }

    fn clamp_carets(&mut self) {
        self.cursor = self.floor_boundary(self.cursor);
        self.anchor = self.floor_boundary(self.anchor);
    }
}

impl TextSurface for EditorBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn anchor(&self) -> usize {
        self.anchor
    }

    fn set_cursor(&mut self, position: usize) {
        let position = self.floor_boundary(position);
        self.cursor = position;
        self.anchor = position;
        self.selection_moved = true;
    }

    fn set_selection(&mut self, anchor: usize, cursor: usize) {
        self.anchor = self.floor_boundary(anchor);
        self.cursor = self.floor_boundary(cursor);
        self.selection_moved = true;
    }

    fn insert_text(&mut self, text: &str) {
        let range = self
            .selection()
            .unwrap_or(self.cursor..self.cursor);
        self.text.replace_range(range.clone(), text);
        let caret = range.start + text.len();
        self.cursor = caret;
        self.anchor = caret;
        self.modified = true;
        self.selection_moved = true;
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = 0;
        self.anchor = 0;
        self.modified = true;
        self.selection_moved = true;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_selection_and_moves_caret() {
        let mut buffer = EditorBuffer::new("hello world");
        buffer.select(6..11);
        buffer.insert_text("rust");
        assert_eq!(buffer.text(), "hello rust");
        assert_eq!(buffer.cursor(), 10);
        assert!(buffer.selection().is_none());
        assert!(buffer.is_modified());
    }

    #[test]
    fn set_text_marks_modified_until_cleared() {
        let mut buffer = EditorBuffer::new("");
        assert!(!buffer.is_modified());
        buffer.set_text("abc");
        assert!(buffer.is_modified());
        buffer.set_modified(false);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn find_selects_forward_match_without_wrapping() {
        let mut buffer = EditorBuffer::new("one two one");
        let query = SearchQuery::new("one");
        assert!(buffer.find(&query));
        assert_eq!(buffer.selection(), Some(0..3));
        assert!(buffer.find(&query));
        assert_eq!(buffer.selection(), Some(8..11));
        assert!(!buffer.find(&query));
        assert_eq!(buffer.selection(), Some(8..11));
    }

    #[test]
    fn find_starts_after_a_backwards_selection() {
        let mut buffer = EditorBuffer::new("foo foo");
        buffer.set_selection(3, 0);
        assert!(buffer.find(&SearchQuery::new("foo")));
        assert_eq!(buffer.selection(), Some(4..7));
        assert_eq!(buffer.cursor(), 7);
    }

    #[test]
    fn replacing_the_document_is_flagged_once_and_clean() {
        let mut buffer = EditorBuffer::new("old");
        buffer.insert_text("typed ");
        buffer.replace_document("new file");
        assert_eq!(buffer.text(), "new file");
        assert!(!buffer.is_modified());
        assert!(buffer.take_replaced());
        assert!(!buffer.take_replaced());

        buffer.set_text("restored by undo");
        assert!(!buffer.take_replaced());
    }

    #[test]
    fn backwards_selection_reports_ordered_range() {
        let mut buffer = EditorBuffer::new("abcdef");
        buffer.set_selection(4, 1);
        assert_eq!(buffer.selection(), Some(1..4));
        assert_eq!(buffer.selected_text(), Some("bcd"));
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn char_level_edits_mark_modified() {
        let mut buffer = EditorBuffer::new("한글");
        assert_eq!(buffer.insert_at_char(1, "x"), 1);
        assert_eq!(buffer.text(), "한x글");
        buffer.delete_char_range(0..1);
        assert_eq!(buffer.text(), "x글");
        assert!(buffer.is_modified());
    }

    #[test]
    fn char_selection_converts_between_bytes_and_chars() {
        let mut buffer = EditorBuffer::new("가나다");
        buffer.set_char_selection(1, 3);
        assert_eq!(buffer.selection(), Some(3..9));
        assert_eq!(buffer.char_selection(), (1, 3));
    }

    #[test]
    fn selection_changes_are_taken_once() {
        let mut buffer = EditorBuffer::new("abc");
        assert_eq!(buffer.take_selection_change(), None);
        buffer.set_cursor(2);
        assert_eq!(buffer.take_selection_change(), Some((2, 2)));
        assert_eq!(buffer.take_selection_change(), None);
    }

    #[test]
    fn line_column_counts_chars() {
        let buffer = EditorBuffer::new("ab\n한국어\nx");
        assert_eq!(buffer.line_column(0), (1, 1));
        assert_eq!(buffer.line_column(3), (2, 1));
        assert_eq!(buffer.line_column(6), (2, 2));
        assert_eq!(buffer.line_column(buffer.len()), (3, 2));
    }
}
