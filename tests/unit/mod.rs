//! Unit Tests Module
//!
//! Component-level tests for envelope parsing, requirement resolution,
//! signature matching and the Horizon client.
