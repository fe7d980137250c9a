//! # MTK Common Library
//!
//! Shared code for the MTK personal multi-tool services:
//! - Database initialization, schema and row models
//! - Bootstrap configuration loading and root folder resolution
//! - Common error type
//! - Time and UUID helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
