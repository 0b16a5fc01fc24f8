//! Message types for the IBC rate limit contract

use common::BigAmount;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

use crate::state::{LimitParams, Limiter};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Addresses allowed to set limit params
    pub authorities: Vec<String>,
    /// Limits applied at instantiation, each as if set through `SetLimitParams`
    #[serde(default)]
    pub limit_params_list: Vec<LimitParams>,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    /// Replace the limiters of a denom and reset its capacity to baseline.
    /// An empty limiter list removes the rate limit.
    ///
    /// Authorization: Authority only
    SetLimitParams { limit_params: LimitParams },

    /// Authorization: Authority only
    AddAuthority { address: String },

    /// The last authority cannot be removed.
    ///
    /// Authorization: Authority only
    RemoveAuthority { address: String },
}

// ============================================================================
// Sudo Messages
// ============================================================================

/// Messages only the chain itself can send.
#[cw_serde]
pub enum SudoMsg {
    /// Per-block hook: recompute all capacities for the time elapsed since
    /// the previous block.
    EndBlock {},
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns each limiter of a denom with its remaining capacity
    #[returns(CapacityByDenomResponse)]
    CapacityByDenom { denom: String },

    /// Returns all limit params, sorted by denom
    #[returns(ListLimitParamsResponse)]
    ListLimitParams {},

    /// Returns send packets that are debited but not yet acknowledged
    #[returns(PendingSendPacketsResponse)]
    AllPendingSendPackets {
        start_after: Option<PendingSendPacket>,
        limit: Option<u32>,
    },

    /// Returns whether a send packet is pending
    #[returns(IsPendingSendPacketResponse)]
    IsPendingSendPacket { channel_id: String, sequence: u64 },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub authorities: Vec<Addr>,
}

#[cw_serde]
pub struct LimiterCapacity {
    pub limiter: Limiter,
    pub capacity: BigAmount,
}

#[cw_serde]
pub struct CapacityByDenomResponse {
    pub denom: String,
    /// Empty when the denom is not rate limited
    pub limiter_capacity_list: Vec<LimiterCapacity>,
}

#[cw_serde]
pub struct ListLimitParamsResponse {
    pub limit_params_list: Vec<LimitParams>,
}

#[cw_serde]
pub struct PendingSendPacket {
    pub channel_id: String,
    pub sequence: u64,
}

#[cw_serde]
pub struct PendingSendPacketsResponse {
    pub pending_send_packets: Vec<PendingSendPacket>,
}

#[cw_serde]
pub struct IsPendingSendPacketResponse {
    pub pending: bool,
}
