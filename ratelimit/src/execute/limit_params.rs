//! Limit params management.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use super::ensure_authority;
use crate::capacity::set_limit_params;
use crate::error::ContractError;
use crate::state::LimitParams;
use crate::tvl::BankSupplyTvl;

/// Replace the limiters of a denom; capacity is reset to the baselines for
/// the current bank supply.
pub fn execute_set_limit_params(
    deps: DepsMut,
    info: MessageInfo,
    limit_params: LimitParams,
) -> Result<Response, ContractError> {
    ensure_authority(deps.storage, &info.sender)?;

    let tvl = BankSupplyTvl::new(deps.querier);
    let capacity = set_limit_params(deps.storage, &tvl, &limit_params)?;

    let capacity_list = capacity
        .capacity_list
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Response::new()
        .add_attribute("method", "set_limit_params")
        .add_attribute("denom", limit_params.denom)
        .add_attribute("limiters", limit_params.limiters.len().to_string())
        .add_attribute("capacity_list", capacity_list))
}
