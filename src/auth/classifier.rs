//! Operation type to threshold tier mapping

use crate::errors::UnknownOperationType;
use crate::types::{OperationType, ThresholdLevel};

/// Threshold tier an operation type requires.
///
/// The set is closed: anything not listed has no safe default and is
/// reported as unknown.
pub fn classify(operation_type: OperationType) -> Result<ThresholdLevel, UnknownOperationType> {
    match operation_type {
        OperationType::BumpSequence | OperationType::AllowTrust => Ok(ThresholdLevel::Low),

        OperationType::ChangeTrust
        | OperationType::CreateAccount
        | OperationType::CreatePassiveSellOffer
        | OperationType::Inflation
        | OperationType::ManageBuyOffer
        | OperationType::ManageData
        | OperationType::ManageSellOffer
        | OperationType::PathPaymentStrictSend
        | OperationType::PathPaymentStrictReceive
        | OperationType::Payment => Ok(ThresholdLevel::Medium),

        OperationType::SetOptions | OperationType::AccountMerge => Ok(ThresholdLevel::High),

        other => Err(UnknownOperationType(other)),
    }
}
