//! lexkit-core — Lexicon loading, anagram search, and quiz file formats.
//!
//! This crate holds the word-level logic every lexkit command builds on:
//! reading word lists and definition files, grouping anagrams, classifying
//! quiz candidates, and rendering the quiz program's file layouts.

pub mod alphagram;
pub mod bingo;
pub mod definitions;
pub mod error;
pub mod export;
pub mod lexicon;
pub mod quiz;
pub mod stats;
pub mod subanagram;
pub mod syllables;
pub mod tricky;
pub mod update;

pub use alphagram::{alphagram, AnagramGroups};
pub use error::{LexiconError, QuizError, UpdateError};
pub use lexicon::Definitions;
