pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod pack;
pub mod remote;
pub mod tui;
pub mod version;

pub use crate::core::Session;
