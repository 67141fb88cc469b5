// src/stale/mod.rs

//! Staleness detection.
//!
//! - [`hash`] hashes file contents.
//! - [`metadata`] reads and writes the per-dependency hashes embedded in
//!   output artifacts.
//! - [`oracle`] combines both into the `is_up_to_date(input, output)`
//!   predicate, with a modification-time fallback.

pub mod hash;
pub mod metadata;
pub mod oracle;

pub use hash::compute_file_hash;
pub use metadata::{parse_dependency_records, stamp_dependencies, DependencyRecord};
pub use oracle::{is_up_to_date_by_time, MetadataOracle, StalenessOracle};
