//! lexkit-db — Write definitions into the quiz program's SQLite lexicon
//! databases.
//!
//! A lexicon database holds a `words(word, definition)` table. Two
//! reconcilers are provided: a lenient one that fills in whatever it can,
//! and a strict one that only commits when the definitions cover every word.

pub mod error;
pub mod reconcile;

pub use error::DbError;
pub use reconcile::{apply_definitions, open_database, sync_definitions, ApplyReport};
