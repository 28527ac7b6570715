use blacknote_core::{LineEnding, Session, TextEncoding, TextSurface};

/// Snapshot shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarState {
    line: usize,
    column: usize,
    wrap: bool,
    encoding: TextEncoding,
    eol: LineEnding,
}

impl StatusBarState {
    pub fn from_session(session: &Session, wrap: bool) -> Self {
        let buffer = session.buffer();
        let (line, column) = buffer.line_column(buffer.cursor());
        Self {
            line,
            column,
            wrap,
            encoding: session.encoding(),
            eol: session.line_ending(),
        }
    }

    pub fn position_text(&self) -> String {
        let wrap = if self.wrap { "ON" } else { "OFF" };
        format!("Ln {} , Col {}    |    Wrap {wrap}", self.line, self.column)
    }

    pub fn document_text(&self) -> String {
        format!("{}    {}", self.encoding.name(), self.eol.label())
    }
}
