//! State definitions for the IBC rate limit contract
//!
//! Per denom the contract stores the configured limiters (`LimitParams`) and a
//! positionally aligned list of remaining capacities (`DenomCapacity`). Send
//! packets whose amount has been debited are tracked until acknowledged or
//! timed out.

use common::BigAmount;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

// ============================================================================
// Limit Configuration
// ============================================================================

/// A single rolling-window limiter.
///
/// Capacity recovers toward
/// `max(baseline_minimum, tvl * baseline_tvl_ppm / 1_000_000)` over `period_seconds`.
#[cw_serde]
pub struct Limiter {
    /// Window length in seconds
    pub period_seconds: u64,
    /// Lower bound of the baseline regardless of TVL
    pub baseline_minimum: BigAmount,
    /// Baseline as parts-per-million of TVL
    pub baseline_tvl_ppm: u32,
}

impl Limiter {
    pub fn validate(&self, index: usize) -> Result<(), ContractError> {
        if self.period_seconds == 0 {
            return Err(ContractError::InvalidPeriod { index });
        }
        if self.baseline_minimum.is_zero() {
            return Err(ContractError::InvalidBaselineMinimum { index });
        }
        if self.baseline_tvl_ppm == 0 || self.baseline_tvl_ppm > PPM_DENOMINATOR {
            return Err(ContractError::InvalidBaselineTvlPpm {
                index,
                ppm: self.baseline_tvl_ppm,
            });
        }
        Ok(())
    }
}

/// All limiters configured for one denom. A withdrawal must satisfy every one.
#[cw_serde]
pub struct LimitParams {
    pub denom: String,
    pub limiters: Vec<Limiter>,
}

impl LimitParams {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate_denom(&self.denom)?;
        for (index, limiter) in self.limiters.iter().enumerate() {
            limiter.validate(index)?;
        }
        Ok(())
    }
}

/// Remaining capacity per limiter, aligned with `LimitParams::limiters`.
#[cw_serde]
pub struct DenomCapacity {
    pub denom: String,
    pub capacity_list: Vec<BigAmount>,
}

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Addresses allowed to set limit params (governance, admin multisig)
    pub authorities: Vec<Addr>,
}

impl Config {
    pub fn is_authority(&self, sender: &Addr) -> bool {
        self.authorities.iter().any(|a| a == sender)
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:ibc-ratelimit";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Denominator of `baseline_tvl_ppm`
pub const PPM_DENOMINATOR: u32 = 1_000_000;

const DENOM_MIN_LEN: usize = 3;
const DENOM_MAX_LEN: usize = 128;

// ============================================================================
// Storage
// ============================================================================

/// Contract configuration
pub const CONFIG: Item<Config> = Item::new("config");

/// Key: denom, Value: LimitParams
pub const LIMIT_PARAMS: Map<&str, LimitParams> = Map::new("limit_params");

/// Key: denom, Value: DenomCapacity
pub const DENOM_CAPACITY: Map<&str, DenomCapacity> = Map::new("denom_capacity");

/// Marker for debited, unresolved send packets.
/// Key: (channel_id, sequence), Value: always true
pub const PENDING_SEND_PACKETS: Map<(&str, u64), bool> = Map::new("pending_send_packet");

/// Block time of the last capacity recomputation
pub const PREVIOUS_BLOCK_TIME: Item<Timestamp> = Item::new("previous_block_time");

// ============================================================================
// Validation
// ============================================================================

/// Cosmos SDK denom rules: `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), ContractError> {
    let invalid = |reason: &str| ContractError::InvalidDenom {
        denom: denom.to_string(),
        reason: reason.to_string(),
    };

    if denom.len() < DENOM_MIN_LEN || denom.len() > DENOM_MAX_LEN {
        return Err(invalid("length must be between 3 and 128"));
    }
    let mut bytes = denom.bytes();
    if !bytes.next().map(|b| b.is_ascii_alphabetic()).unwrap_or(false) {
        return Err(invalid("must start with a letter"));
    }
    if !bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-')) {
        return Err(invalid("contains invalid characters"));
    }
    Ok(())
}
