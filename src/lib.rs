//! # Heimdall-RS: Hybrid Name Screening Engine
//!
//! A Rust engine for screening query names against sanctions and watchlist
//! reference names. It surfaces probable identity matches despite spelling
//! variants, transliteration noise, honorifics, multi-alias entries, and
//! word-order differences. This library provides:
//!
//! - **Normalization**: diacritic folding, alias splitting, honorific
//!   removal, and spelling-variant canonicalization
//! - **Hybrid Scoring**: blended edit-distance, prefix-weighted, and
//!   phonetic similarity with configurable weights
//! - **Parallel Screening**: all-pairs evaluation across a sized worker
//!   pool with deterministic result ordering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Screening Engine                      │
//! ├─────────────────────────────────────────────────────────┤
//! │   Matching          │   Core                            │
//! │ • Normalizer        │ • Config (thresholds, weights)    │
//! │ • Phonetic Encoder  │ • Errors                          │
//! │ • Similarity Scorer │                                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use heimdall_rs::{ScreeningConfig, ScreeningEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ScreeningEngine::new(ScreeningConfig::default())?;
//!
//!     let queries = vec!["Mr. John Smith".to_string()];
//!     let references = vec!["John Smith".to_string()];
//!
//!     let records = engine.screen(&queries, &references)?;
//!     println!("{} record(s)", records.len());
//!     Ok(())
//! }
//! ```
//!
//! List acquisition, spreadsheet ingestion, and result export are external
//! collaborators: the engine consumes plain string sequences and hands back
//! ordered [`MatchRecord`]s.

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Core configuration and error types
pub mod core {
    //! Configuration and error handling.

    pub mod config;
    pub mod errors;
}

// Name canonicalization and similarity algorithms
pub mod matching {
    //! Name normalization, phonetic encoding, and similarity scoring.

    pub mod normalize;
    pub mod phonetic;
    pub mod scoring;
}

// Screening orchestration
pub mod screening {
    //! Parallel all-pairs screening and result records.

    pub mod engine;
    pub mod records;
}

// Re-export primary types for convenience
pub use core::config::{MatchMode, NormalizerConfig, ScoringWeights, ScreeningConfig};
pub use core::errors::{HeimdallError, Result};
pub use matching::normalize::{NameVariant, NormalizedName, Normalizer};
pub use matching::phonetic::{PhoneticCode, PhoneticEncoder};
pub use matching::scoring::SimilarityScorer;
pub use screening::engine::{ReferenceSet, ScreeningEngine};
pub use screening::records::{MatchRecord, NO_MATCH};

// Whole-run cancellation handle, re-exported so callers and tests don't
// need a direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
