#![allow(clippy::multiple_crate_versions)]

//! Parallel source line-counting engine.
//!
//! The core is a byte-level state machine ([`scanner::count_stats`]) that
//! classifies every line of a file as blank, code or comment in a single
//! forward pass, while also recognizing complexity tokens and digesting the
//! content for duplicate detection. [`pipeline::run`] drives the scanner
//! over many files through a reader stage and a scanner stage connected by
//! bounded channels.
//!
//! ```no_run
//! use locscan::config::ScanConfig;
//! use locscan::language::LanguageRegistry;
//! use locscan::pipeline;
//! use locscan::stats::FileJob;
//! use std::sync::Arc;
//!
//! let languages = Arc::new(LanguageRegistry::builtin());
//! let jobs = vec![FileJob::new("src/lib.rs", "rust")];
//! for job in pipeline::run(jobs, &languages, &ScanConfig::default()) {
//!     println!("{}: {} code lines", job.location.display(), job.code);
//! }
//! ```

pub mod config;
pub mod dedupe;
pub mod error;
pub mod language;
pub mod matcher;
pub mod pipeline;
pub mod scanner;
pub mod stats;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{EngineError, Result};
pub use language::{LanguageProfile, LanguageRegistry};
pub use stats::{FileJob, HashValue, LineObserver, LineType};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
