//! lexkit-tourney — Game records and tournament files.
//!
//! Score statistics over downloaded game-database exports, the score
//! difference table used by standings simulations, results conversion to
//! the `.t` format, and GCG note annotation.

pub mod coco;
pub mod error;
pub mod games;
pub mod gcg;

pub use error::TourneyError;
pub use games::GameRecord;
