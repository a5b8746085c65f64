//! Shared test utilities for reviewlens integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with temp dataset and output directories
//! - Builders for tables, configs and scripted classification services

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
