//! Query handlers for the IBC rate limit contract.

use cosmwasm_std::{Deps, StdResult};

use crate::capacity::{get_all_limit_params, get_denom_capacity, get_limit_params};
use crate::error::ContractError;
use crate::msg::{
    CapacityByDenomResponse, ConfigResponse, IsPendingSendPacketResponse, LimiterCapacity,
    ListLimitParamsResponse, PendingSendPacket, PendingSendPacketsResponse,
};
use crate::pending::{all_pending_send_packets, has_pending_send_packet};
use crate::state::CONFIG;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        authorities: config.authorities,
    })
}

/// Pair each limiter with its remaining capacity.
pub fn query_capacity_by_denom(
    deps: Deps,
    denom: String,
) -> Result<CapacityByDenomResponse, ContractError> {
    let limit_params = get_limit_params(deps.storage, &denom)?;
    let capacity = get_denom_capacity(deps.storage, &denom)?;

    if limit_params.limiters.len() != capacity.capacity_list.len() {
        return Err(ContractError::CapacityListLengthMismatch {
            denom,
            capacities: capacity.capacity_list.len(),
            limiters: limit_params.limiters.len(),
        });
    }

    let limiter_capacity_list = limit_params
        .limiters
        .into_iter()
        .zip(capacity.capacity_list)
        .map(|(limiter, capacity)| LimiterCapacity { limiter, capacity })
        .collect();

    Ok(CapacityByDenomResponse {
        denom,
        limiter_capacity_list,
    })
}

pub fn query_list_limit_params(deps: Deps) -> StdResult<ListLimitParamsResponse> {
    Ok(ListLimitParamsResponse {
        limit_params_list: get_all_limit_params(deps.storage)?,
    })
}

pub fn query_all_pending_send_packets(
    deps: Deps,
    start_after: Option<PendingSendPacket>,
    limit: Option<u32>,
) -> StdResult<PendingSendPacketsResponse> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after
        .as_ref()
        .map(|p| (p.channel_id.as_str(), p.sequence));

    let pending_send_packets = all_pending_send_packets(deps.storage, start, Some(limit))?
        .into_iter()
        .map(|(channel_id, sequence)| PendingSendPacket {
            channel_id,
            sequence,
        })
        .collect();

    Ok(PendingSendPacketsResponse {
        pending_send_packets,
    })
}

pub fn query_is_pending_send_packet(
    deps: Deps,
    channel_id: String,
    sequence: u64,
) -> StdResult<IsPendingSendPacketResponse> {
    Ok(IsPendingSendPacketResponse {
        pending: has_pending_send_packet(deps.storage, &channel_id, sequence),
    })
}
