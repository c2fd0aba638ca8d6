//! Integration Tests Module
//!
//! End-to-end tests that drive `Analyzer::analyze` from base64 envelopes
//! through resolution, matching and evaluation.

pub mod analyze_pipeline;
pub mod snapshot_file;
