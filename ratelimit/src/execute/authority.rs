//! Authority allow-list management.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use super::ensure_authority;
use crate::error::ContractError;
use crate::state::CONFIG;

pub fn execute_add_authority(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = ensure_authority(deps.storage, &info.sender)?;

    let authority = deps.api.addr_validate(&address)?;
    if config.is_authority(&authority) {
        return Err(ContractError::AuthorityAlreadyExists { address });
    }

    config.authorities.push(authority);
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "add_authority")
        .add_attribute("authority", address))
}

pub fn execute_remove_authority(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = ensure_authority(deps.storage, &info.sender)?;

    let authority = deps.api.addr_validate(&address)?;
    if !config.is_authority(&authority) {
        return Err(ContractError::AuthorityNotFound { address });
    }

    config.authorities.retain(|a| a != &authority);
    if config.authorities.is_empty() {
        return Err(ContractError::CannotRemoveLastAuthority);
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "remove_authority")
        .add_attribute("authority", address))
}
