//! Authorization requirement and signature verification engine
//!
//! Control flow for one envelope:
//! 1. **coordinator** decides plain vs fee-bump and drives the passes
//! 2. **resolver** turns the transaction into one requirement per account
//! 3. **matcher** attributes each envelope signature to the first verifying signer
//! 4. **evaluator** sums attributed weight per account
//!
//! **classifier** and **verifier** are the pure leaves used along the way.

pub mod classifier;
pub mod coordinator;
pub mod evaluator;
pub mod matcher;
pub mod resolver;
pub mod verifier;

pub use classifier::classify;
pub use coordinator::{Analyzer, DEFAULT_FETCH_CONCURRENCY};
pub use evaluator::evaluate;
pub use matcher::{candidate_signers, match_signatures};
pub use resolver::{AccountDemand, AccountSnapshots, Resolution};
pub use verifier::verify;
