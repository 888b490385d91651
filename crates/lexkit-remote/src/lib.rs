//! lexkit-remote — HTTP clients for the services lexkit talks to.
//!
//! Covers the game-database REST API, spreadsheet TSV export, and
//! tournament-director file hosting, plus the shared config file.

pub mod config;
pub mod crosstables;
pub mod error;
pub mod http;
pub mod mock;
pub mod sheets;
pub mod tsh;

pub use config::{load_config, load_config_from, LexkitConfig};
pub use crosstables::{CrossTablesClient, GameSource, RetryPolicy};
pub use error::RemoteError;
pub use sheets::SheetsClient;
