//! Error types for the IBC rate limit contract
//!
//! Every variant carries the context needed to diagnose it (denom, limiter
//! index, channel and sequence). `ContractError::kind` gives a coarse
//! classification that callers can match on without inspecting messages.

use common::BigAmount;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: {sender} is not an authority")]
    Unauthorized { sender: String },

    #[error("Address {address} is already an authority")]
    AuthorityAlreadyExists { address: String },

    #[error("Address {address} is not an authority")]
    AuthorityNotFound { address: String },

    #[error("Cannot remove the last authority")]
    CannotRemoveLastAuthority,

    #[error("At least one authority required")]
    NoAuthorities,

    // ========================================================================
    // Limit Params Validation Errors
    // ========================================================================

    #[error("Invalid rate limit denom '{denom}': {reason}")]
    InvalidDenom { denom: String, reason: String },

    #[error("Invalid rate limit period (limiter index: {index}): period must be greater than 0")]
    InvalidPeriod { index: usize },

    #[error("Invalid baseline minimum (limiter index: {index}): must be greater than 0")]
    InvalidBaselineMinimum { index: usize },

    #[error("Invalid baseline TVL ppm (limiter index: {index}): {ppm} not in (0, 1000000]")]
    InvalidBaselineTvlPpm { index: usize, ppm: u32 },

    // ========================================================================
    // Capacity Errors
    // ========================================================================

    #[error("withdrawal amount would exceed rate-limit capacity: denom = {denom}, capacity(index: {index}) = {capacity}, amount = {amount}")]
    WithdrawalExceedsCapacity {
        denom: String,
        index: usize,
        capacity: BigAmount,
        amount: BigAmount,
    },

    // ========================================================================
    // State Corruption Errors
    // ========================================================================

    #[error("Capacity list length mismatch for denom {denom}: {capacities} capacities, {limiters} limiters")]
    CapacityListLengthMismatch {
        denom: String,
        capacities: usize,
        limiters: usize,
    },

    // ========================================================================
    // Packet Errors
    // ========================================================================

    #[error("Invalid transfer packet data (channel: {channel_id}, sequence: {sequence}): {source}")]
    InvalidPacketData {
        channel_id: String,
        sequence: u64,
        #[source]
        source: StdError,
    },

    #[error("Unable to cast packet amount '{amount}' to big integer (channel: {channel_id}, sequence: {sequence})")]
    InvalidPacketAmount {
        channel_id: String,
        sequence: u64,
        amount: String,
    },

    #[error("cannot unmarshal ICS-20 transfer packet acknowledgement: {source}")]
    UnmarshalAcknowledgement {
        #[source]
        source: StdError,
    },

    #[error("Invalid acknowledgement: {reason}")]
    InvalidAcknowledgement { reason: String },
}

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input (limit params or sender); no state was touched
    Validation,
    /// A withdrawal would breach a limiter
    CapacityExceeded,
    /// Persisted state violates an invariant
    StateCorruption,
    /// Malformed packet or acknowledgement
    PacketParse,
    /// Storage, serialization or collaborator failure
    Std,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Std(_) => ErrorKind::Std,
            ContractError::Unauthorized { .. }
            | ContractError::AuthorityAlreadyExists { .. }
            | ContractError::AuthorityNotFound { .. }
            | ContractError::CannotRemoveLastAuthority
            | ContractError::NoAuthorities
            | ContractError::InvalidDenom { .. }
            | ContractError::InvalidPeriod { .. }
            | ContractError::InvalidBaselineMinimum { .. }
            | ContractError::InvalidBaselineTvlPpm { .. } => ErrorKind::Validation,
            ContractError::WithdrawalExceedsCapacity { .. } => ErrorKind::CapacityExceeded,
            ContractError::CapacityListLengthMismatch { .. } => ErrorKind::StateCorruption,
            ContractError::InvalidPacketData { .. }
            | ContractError::InvalidPacketAmount { .. }
            | ContractError::UnmarshalAcknowledgement { .. }
            | ContractError::InvalidAcknowledgement { .. } => ErrorKind::PacketParse,
        }
    }
}
