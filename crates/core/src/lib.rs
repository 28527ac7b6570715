pub mod document;
pub mod editor;
pub mod find_replace;
pub mod host;
pub mod recent;
pub mod session;

pub use blacknote_search::{SearchError, SearchQuery};
pub use document::{DecodedText, DocumentError, LegacyFallback, LineEnding, TextEncoding};
pub use editor::{EditorBuffer, TextSurface};
pub use find_replace::FindReplace;
pub use host::{Notify, SaveChoice, SessionHost};
pub use recent::{set_app_identity, RecentDocuments, RecentLog, ShellRecentDocuments};
pub use session::{Session, APP_NAME};
