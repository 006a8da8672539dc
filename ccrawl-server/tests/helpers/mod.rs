//! Test Helper Utilities
//!
//! Shared fakes for testing ccrawl-server without network access

#![allow(dead_code, unused_imports)]

pub mod fake_catalog;

pub use fake_catalog::{album, test_service, FakeCatalog};
