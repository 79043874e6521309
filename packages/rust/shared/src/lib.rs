//! Shared types, error model, and configuration for docboard.
//!
//! This crate is the foundation depended on by the fetch and dataset crates
//! and both apps. It provides:
//! - [`DocboardError`] — the unified error type
//! - Domain types ([`JobDoc`], [`Dataset`], [`Summary`], required columns)
//! - Configuration ([`AppConfig`], [`SourceConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchConfig, SourceConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{DocboardError, Result};
pub use types::{
    COL_DEPARTMENT, COL_PDF_PATH, COL_POSITION, COL_UPDATED_AT, COL_VALIDITY_DAYS, Dataset, JobDoc,
    REQUIRED_COLUMNS, Summary,
};
