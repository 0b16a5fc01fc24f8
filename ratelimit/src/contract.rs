//! IBC Rate Limit Contract - Entry Points
//!
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `sudo` - The per-block capacity update, called by the chain

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response,
};
use cw2::set_contract_version;

use crate::capacity::{set_limit_params, update_all_capacities};
use crate::error::ContractError;
use crate::execute::{execute_add_authority, execute_remove_authority, execute_set_limit_params};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, SudoMsg};
use crate::query::{
    query_all_pending_send_packets, query_capacity_by_denom, query_config,
    query_is_pending_send_packet, query_list_limit_params,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, PREVIOUS_BLOCK_TIME};
use crate::tvl::BankSupplyTvl;

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.authorities.is_empty() {
        return Err(ContractError::NoAuthorities);
    }
    let mut authorities: Vec<Addr> = Vec::with_capacity(msg.authorities.len());
    for address in &msg.authorities {
        let authority = deps.api.addr_validate(address)?;
        if !authorities.contains(&authority) {
            authorities.push(authority);
        }
    }
    let authority_count = authorities.len();
    CONFIG.save(deps.storage, &Config { authorities })?;

    PREVIOUS_BLOCK_TIME.save(deps.storage, &env.block.time)?;

    let tvl = BankSupplyTvl::new(deps.querier);
    for limit_params in &msg.limit_params_list {
        set_limit_params(deps.storage, &tvl, limit_params)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("authorities", authority_count.to_string())
        .add_attribute("limit_params", msg.limit_params_list.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetLimitParams { limit_params } => {
            execute_set_limit_params(deps, info, limit_params)
        }
        ExecuteMsg::AddAuthority { address } => execute_add_authority(deps, info, address),
        ExecuteMsg::RemoveAuthority { address } => execute_remove_authority(deps, info, address),
    }
}

// ============================================================================
// Sudo
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::EndBlock {} => {
            let tvl = BankSupplyTvl::new(deps.querier);
            let update = update_all_capacities(deps.storage, &tvl, env.block.time)?;

            let mut response = Response::new()
                .add_attribute("method", "end_block")
                .add_attribute("updated", update.updated.len().to_string());
            if !update.skipped.is_empty() {
                response = response.add_attribute("skipped", update.skipped.join(","));
            }
            Ok(response)
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let binary = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::CapacityByDenom { denom } => {
            to_json_binary(&query_capacity_by_denom(deps, denom)?)
        }
        QueryMsg::ListLimitParams {} => to_json_binary(&query_list_limit_params(deps)?),
        QueryMsg::AllPendingSendPackets { start_after, limit } => {
            to_json_binary(&query_all_pending_send_packets(deps, start_after, limit)?)
        }
        QueryMsg::IsPendingSendPacket {
            channel_id,
            sequence,
        } => to_json_binary(&query_is_pending_send_packet(deps, channel_id, sequence)?),
    }?;
    Ok(binary)
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("method", "migrate"))
}
