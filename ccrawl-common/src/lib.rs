//! # ConcertCrawler Common Library
//!
//! Shared code for the ConcertCrawler service including:
//! - Error types
//! - TOML bootstrap configuration loading
//! - Catalog credential resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
