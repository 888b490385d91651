pub mod db;
pub mod defs;
pub mod init;
pub mod quiz;
pub mod tourney;
pub mod words;
pub mod xt;
