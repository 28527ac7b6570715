use std::ops::Range;

use blacknote_search::{Matcher, SearchQuery};
use tracing::debug;

use crate::editor::TextSurface;
use crate::host::Notify;

/// Drives Find Next, Replace and Replace All over a [`TextSurface`].
///
/// Each call compiles its query afresh. The only thing remembered between
/// calls is the range selected by the most recent successful find, so that
/// Replace acts on its own match and never on an arbitrary user selection.
#[derive(Debug, Clone, Default)]
pub struct FindReplace {
    last_match: Option<Range<usize>>,
}

impl FindReplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches forward from the caret, wrapping to the start once.
    ///
    /// When nothing matches, the user is told so and the caret and selection
    /// are restored to where they were.
    pub fn find_next(
        &mut self,
        surface: &mut dyn TextSurface,
        query: &SearchQuery,
        notify: &mut dyn Notify,
    ) -> bool {
        self.last_match = None;
        if query.pattern.is_empty() {
            return false;
        }
        let (anchor, cursor) = (surface.anchor(), surface.cursor());

        let mut found = surface.find(query);
        if !found {
            surface.set_cursor(0);
            found = surface.find(query);
        }
        if !found {
            surface.set_selection(anchor, cursor);
            notify.report_info("Find", "No matches found.");
            return false;
        }
        self.last_match = surface.selection();
        true
    }

    /// Replaces the current match, then advances to the next one.
    pub fn replace_one(
        &mut self,
        surface: &mut dyn TextSurface,
        query: &SearchQuery,
        notify: &mut dyn Notify,
    ) -> bool {
        let Ok(matcher) = Matcher::new(query) else {
            return false;
        };
        let on_own_match = match (surface.selection(), self.last_match.as_ref()) {
            (Some(selection), Some(last)) => {
                selection == *last && matcher.matches_at(surface.text(), &selection)
            }
            _ => false,
        };
        if !on_own_match && !self.find_next(surface, query, notify) {
            return false;
        }

        surface.insert_text(query.replacement_text());
        self.last_match = None;
        self.find_next(surface, query, notify);
        true
    }

    /// Replaces every match from the start of the document and reports the count.
    pub fn replace_all(
        &mut self,
        surface: &mut dyn TextSurface,
        query: &SearchQuery,
        notify: &mut dyn Notify,
    ) -> usize {
        self.last_match = None;
        if query.pattern.is_empty() {
            return 0;
        }
        let replacement = query.replacement_text();

        surface.set_cursor(0);
        let mut count = 0;
        // The caret ends up after each inserted replacement, so every find starts past it.
        while surface.find(query) {
            surface.insert_text(replacement);
            count += 1;
        }
        debug!(count, "replace all finished");
        notify.report_info("Replace All", &format!("Replaced {count} occurrence(s)."));
        count
    }
}
