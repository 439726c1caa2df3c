//! CLI library components for drift analytics.

pub mod config;
pub mod inspect;
pub mod logging;
pub mod summary;
