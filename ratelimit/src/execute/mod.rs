//! Execute handlers for the IBC rate limit contract.
//!
//! - `limit_params` - SetLimitParams
//! - `authority` - Authority allow-list management

mod authority;
mod limit_params;

pub use authority::*;
pub use limit_params::*;

use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::{Config, CONFIG};

/// Load the config and check that `sender` may change it.
fn ensure_authority(storage: &dyn Storage, sender: &Addr) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if !config.is_authority(sender) {
        return Err(ContractError::Unauthorized {
            sender: sender.to_string(),
        });
    }
    Ok(config)
}
