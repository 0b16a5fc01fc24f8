//! Total value locked lookups.

use std::collections::BTreeMap;

use common::BigAmount;
use cosmwasm_std::{QuerierWrapper, StdResult};

/// Source of the TVL a baseline is scaled from.
pub trait TvlProvider {
    fn current_tvl(&self, denom: &str) -> StdResult<BigAmount>;
}

/// TVL as the bank module's total supply of the denom.
pub struct BankSupplyTvl<'a> {
    querier: QuerierWrapper<'a>,
}

impl<'a> BankSupplyTvl<'a> {
    pub fn new(querier: QuerierWrapper<'a>) -> Self {
        Self { querier }
    }
}

impl TvlProvider for BankSupplyTvl<'_> {
    fn current_tvl(&self, denom: &str) -> StdResult<BigAmount> {
        let supply = self.querier.query_supply(denom)?;
        Ok(BigAmount::from(supply.amount))
    }
}

/// Fixed snapshot; denoms that are absent have zero TVL.
impl TvlProvider for BTreeMap<String, BigAmount> {
    fn current_tvl(&self, denom: &str) -> StdResult<BigAmount> {
        Ok(self.get(denom).cloned().unwrap_or_default())
    }
}
