//! Shared types, error model, and configuration for copyscan.
//!
//! This crate is the foundation depended on by all other copyscan crates.
//! It provides:
//! - [`CopyscanError`] — the unified error type
//! - Domain types ([`SentenceUnit`], [`CandidateReference`], [`MatchResult`],
//!   [`AggregateReport`], [`FileComparison`], [`CheckId`])
//! - Configuration ([`AppConfig`], runtime config sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnnotateConfig, AppConfig, FetchConfig, PipelineConfig, SearchConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{CopyscanError, Result};
pub use types::{
    AggregateReport, CandidateReference, CheckId, FileComparison, MatchResult,
    NO_PLAGIARISM_MESSAGE, SentenceUnit,
};
