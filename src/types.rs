//! Stellar Transaction Inspector - Type System
//!
//! - `account`: Ledger account snapshots (thresholds, signers, balances)
//! - `transaction`: Parsed envelopes, transactions and operations
//! - `analysis`: Authorization requirements, signature attributions and outcomes

mod account;
mod analysis;
mod transaction;

pub use account::*;
pub use analysis::*;
pub use transaction::*;
