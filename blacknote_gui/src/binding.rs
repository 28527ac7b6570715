use std::ops::Range;

use blacknote_core::document::normalize_newlines;
use blacknote_core::{EditorBuffer, TextSurface};

/// Lets the egui text widget edit an [`EditorBuffer`] in place.
///
/// Every edit the widget makes goes through the buffer, so typing, pasting and
/// widget-level undo all mark the document as modified.
pub struct DocumentText<'a>(pub &'a mut EditorBuffer);

impl egui::TextBuffer for DocumentText<'_> {
    fn is_mutable(&self) -> bool {
        true
    }

    fn as_str(&self) -> &str {
        self.0.text()
    }

    fn insert_text(&mut self, text: &str, char_index: usize) -> usize {
        self.0.insert_at_char(char_index, text)
    }

    fn delete_char_range(&mut self, char_range: Range<usize>) {
        self.0.delete_char_range(char_range);
    }
}

/// Inserts clipboard text over the selection. Returns `false` when there was nothing to paste.
pub fn paste_into(buffer: &mut EditorBuffer, clip: &str) -> bool {
    if clip.is_empty() {
        return false;
    }
    buffer.insert_text(&normalize_newlines(clip));
    true
}

/// Forgets the widget's undo and redo history for the editor `id`.
pub fn reset_history(ctx: &egui::Context, id: egui::Id) {
    let mut state = egui::TextEdit::load_state(ctx, id).unwrap_or_default();
    state.set_undoer(Default::default());
    state.store(ctx, id);
}
