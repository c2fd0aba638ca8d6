//! Stellar Transaction Authorization Inspector
//!
//! Works out which accounts must authorize a transaction envelope, at which
//! threshold, and whether the attached signatures satisfy them.

pub mod auth;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod horizon;
pub mod provider;
pub mod report;
pub mod types;
pub mod utils;
