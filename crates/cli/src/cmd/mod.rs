//! CLI command implementations

pub mod config;
pub mod start;
pub mod stop;
pub mod sync;
