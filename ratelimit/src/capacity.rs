//! Capacity bookkeeping: limit params, remaining capacity, withdrawals,
//! deposits and the per-block recomputation.

use common::BigAmount;
use cosmwasm_std::{Order, StdResult, Storage, Timestamp};
use tracing::{debug, error, info};

use crate::baseline::get_baseline;
use crate::decay::calculate_new_capacity_list;
use crate::error::ContractError;
use crate::state::{DenomCapacity, LimitParams, DENOM_CAPACITY, LIMIT_PARAMS, PREVIOUS_BLOCK_TIME};
use crate::tvl::TvlProvider;

// ============================================================================
// Denom Capacity
// ============================================================================

/// Missing entries load as an empty capacity list.
pub fn get_denom_capacity(storage: &dyn Storage, denom: &str) -> StdResult<DenomCapacity> {
    Ok(DENOM_CAPACITY
        .may_load(storage, denom)?
        .unwrap_or_else(|| DenomCapacity {
            denom: denom.to_string(),
            capacity_list: vec![],
        }))
}

/// Saving an empty capacity list deletes the entry.
pub fn set_denom_capacity(storage: &mut dyn Storage, capacity: &DenomCapacity) -> StdResult<()> {
    if capacity.capacity_list.is_empty() {
        DENOM_CAPACITY.remove(storage, &capacity.denom);
        return Ok(());
    }
    DENOM_CAPACITY.save(storage, &capacity.denom, capacity)
}

// ============================================================================
// Limit Params
// ============================================================================

/// Missing entries load as params with no limiters.
pub fn get_limit_params(storage: &dyn Storage, denom: &str) -> StdResult<LimitParams> {
    Ok(LIMIT_PARAMS
        .may_load(storage, denom)?
        .unwrap_or_else(|| LimitParams {
            denom: denom.to_string(),
            limiters: vec![],
        }))
}

/// All limit params in ascending denom order.
pub fn get_all_limit_params(storage: &dyn Storage) -> StdResult<Vec<LimitParams>> {
    LIMIT_PARAMS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, params)| params))
        .collect()
}

/// Replace the limiters of a denom and reset its capacity to the current
/// baselines. An empty limiter list removes the denom from rate limiting.
///
/// Returns the capacity that was stored.
pub fn set_limit_params(
    storage: &mut dyn Storage,
    tvl: &dyn TvlProvider,
    limit_params: &LimitParams,
) -> Result<DenomCapacity, ContractError> {
    limit_params.validate()?;

    if limit_params.limiters.is_empty() {
        LIMIT_PARAMS.remove(storage, &limit_params.denom);
        DENOM_CAPACITY.remove(storage, &limit_params.denom);
        info!(denom = %limit_params.denom, "rate limit removed");
        return Ok(DenomCapacity {
            denom: limit_params.denom.clone(),
            capacity_list: vec![],
        });
    }

    let current_tvl = tvl.current_tvl(&limit_params.denom)?;
    let capacity = DenomCapacity {
        denom: limit_params.denom.clone(),
        capacity_list: limit_params
            .limiters
            .iter()
            .map(|limiter| get_baseline(&current_tvl, limiter))
            .collect(),
    };

    LIMIT_PARAMS.save(storage, &limit_params.denom, limit_params)?;
    set_denom_capacity(storage, &capacity)?;

    info!(
        denom = %limit_params.denom,
        limiters = limit_params.limiters.len(),
        tvl = %current_tvl,
        "rate limit params set"
    );
    Ok(capacity)
}

// ============================================================================
// Withdrawals and Deposits
// ============================================================================

/// Debit `amount` from every limiter of `denom`.
///
/// Fails without writing anything if any limiter has less than `amount` left.
/// Denoms without limiters are not rate limited.
pub fn process_withdrawal(
    storage: &mut dyn Storage,
    denom: &str,
    amount: &BigAmount,
) -> Result<(), ContractError> {
    let capacity = get_denom_capacity(storage, denom)?;
    if capacity.capacity_list.is_empty() {
        return Ok(());
    }

    let mut new_capacity_list = Vec::with_capacity(capacity.capacity_list.len());
    for (index, remaining) in capacity.capacity_list.iter().enumerate() {
        match remaining.checked_sub(amount) {
            Some(next) => new_capacity_list.push(next),
            None => {
                return Err(ContractError::WithdrawalExceedsCapacity {
                    denom: denom.to_string(),
                    index,
                    capacity: remaining.clone(),
                    amount: amount.clone(),
                })
            }
        }
    }

    set_denom_capacity(
        storage,
        &DenomCapacity {
            denom: denom.to_string(),
            capacity_list: new_capacity_list,
        },
    )?;
    Ok(())
}

/// Credit `amount` to every limiter of `denom`. Capacity may exceed the
/// baseline; decay brings it back down.
pub fn process_deposit(storage: &mut dyn Storage, denom: &str, amount: &BigAmount) -> StdResult<()> {
    let capacity = get_denom_capacity(storage, denom)?;
    if capacity.capacity_list.is_empty() {
        return Ok(());
    }

    let capacity_list = capacity
        .capacity_list
        .iter()
        .map(|remaining| remaining + amount)
        .collect();

    set_denom_capacity(
        storage,
        &DenomCapacity {
            denom: denom.to_string(),
            capacity_list,
        },
    )
}

// ============================================================================
// Block Updates
// ============================================================================

/// Outcome of one end-block pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityUpdate {
    /// Denoms whose capacity was recomputed
    pub updated: Vec<String>,
    /// Denoms left untouched because of an error
    pub skipped: Vec<String>,
}

/// Move every capacity toward its baseline for the time since the previous
/// call, then record `block_time`.
///
/// The first call only records the time. A denom that fails is logged and
/// skipped; the others are still updated.
pub fn update_all_capacities(
    storage: &mut dyn Storage,
    tvl: &dyn TvlProvider,
    block_time: Timestamp,
) -> StdResult<CapacityUpdate> {
    let mut update = CapacityUpdate::default();

    let previous = match PREVIOUS_BLOCK_TIME.may_load(storage)? {
        Some(previous) => previous,
        None => {
            PREVIOUS_BLOCK_TIME.save(storage, &block_time)?;
            return Ok(update);
        }
    };

    if block_time <= previous {
        error!(
            previous = %previous,
            current = %block_time,
            "non-positive time since last capacity update, skipping"
        );
        return Ok(update);
    }
    let elapsed_nanos = block_time.nanos() - previous.nanos();

    for limit_params in get_all_limit_params(storage)? {
        let denom = limit_params.denom.clone();
        match update_denom_capacity(storage, tvl, &limit_params, elapsed_nanos) {
            Ok(()) => update.updated.push(denom),
            Err(err) => {
                error!(denom = %denom, error = %err, "failed to update capacity, skipping denom");
                update.skipped.push(denom);
            }
        }
    }

    PREVIOUS_BLOCK_TIME.save(storage, &block_time)?;
    debug!(
        updated = update.updated.len(),
        skipped = update.skipped.len(),
        elapsed_nanos,
        "capacities updated"
    );
    Ok(update)
}

fn update_denom_capacity(
    storage: &mut dyn Storage,
    tvl: &dyn TvlProvider,
    limit_params: &LimitParams,
    elapsed_nanos: u64,
) -> Result<(), ContractError> {
    let current_tvl = tvl.current_tvl(&limit_params.denom)?;
    let capacity = get_denom_capacity(storage, &limit_params.denom)?;
    let capacity_list = calculate_new_capacity_list(
        &current_tvl,
        limit_params,
        &capacity.capacity_list,
        elapsed_nanos,
    )?;
    set_denom_capacity(
        storage,
        &DenomCapacity {
            denom: limit_params.denom.clone(),
            capacity_list,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::StdError;

    use super::*;
    use crate::state::Limiter;

    const USDC: &str = "ibc/8E27BA2D5493AF5636760E354E46004562C46AB7EC0CC4C1CA14E9E20E2545B5";

    struct FailingTvl;

    impl TvlProvider for FailingTvl {
        fn current_tvl(&self, denom: &str) -> StdResult<BigAmount> {
            Err(StdError::generic_err(format!("no supply for {}", denom)))
        }
    }

    fn amount(value: u128) -> BigAmount {
        BigAmount::from(value)
    }

    fn limiter(period_seconds: u64, minimum: u128, ppm: u32) -> Limiter {
        Limiter {
            period_seconds,
            baseline_minimum: amount(minimum),
            baseline_tvl_ppm: ppm,
        }
    }

    fn tvl(denom: &str, value: u128) -> BTreeMap<String, BigAmount> {
        let mut snapshot = BTreeMap::new();
        snapshot.insert(denom.to_string(), amount(value));
        snapshot
    }

    fn usdc_params() -> LimitParams {
        LimitParams {
            denom: USDC.to_string(),
            limiters: vec![
                limiter(3_600, 100_000_000_000, 10_000),
                limiter(86_400, 1_000_000_000_000, 100_000),
            ],
        }
    }

    fn capacity(storage: &dyn Storage, denom: &str) -> Vec<BigAmount> {
        get_denom_capacity(storage, denom).unwrap().capacity_list
    }

    #[test]
    fn test_missing_entries_load_empty() {
        let storage = MockStorage::new();
        assert!(capacity(&storage, USDC).is_empty());
        assert!(get_limit_params(&storage, USDC).unwrap().limiters.is_empty());
        assert!(get_all_limit_params(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_set_empty_capacity_deletes() {
        let mut storage = MockStorage::new();
        set_denom_capacity(
            &mut storage,
            &DenomCapacity {
                denom: USDC.to_string(),
                capacity_list: vec![amount(1)],
            },
        )
        .unwrap();
        assert!(DENOM_CAPACITY.has(&storage, USDC));

        set_denom_capacity(
            &mut storage,
            &DenomCapacity {
                denom: USDC.to_string(),
                capacity_list: vec![],
            },
        )
        .unwrap();
        assert!(!DENOM_CAPACITY.has(&storage, USDC));
    }

    #[test]
    fn test_set_limit_params_resets_to_baseline() {
        let mut storage = MockStorage::new();

        // tvl 50M: 1% and 10%
        let stored =
            set_limit_params(&mut storage, &tvl(USDC, 50_000_000_000_000), &usdc_params()).unwrap();
        assert_eq!(
            stored.capacity_list,
            vec![amount(500_000_000_000), amount(5_000_000_000_000)]
        );
        assert_eq!(capacity(&storage, USDC), stored.capacity_list);
        assert_eq!(get_limit_params(&storage, USDC).unwrap(), usdc_params());

        // tvl 0: minimums
        let stored = set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();
        assert_eq!(
            stored.capacity_list,
            vec![amount(100_000_000_000), amount(1_000_000_000_000)]
        );
    }

    #[test]
    fn test_set_limit_params_with_no_limiters_deletes() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        let cleared = LimitParams {
            denom: USDC.to_string(),
            limiters: vec![],
        };
        set_limit_params(&mut storage, &BTreeMap::new(), &cleared).unwrap();

        assert!(!LIMIT_PARAMS.has(&storage, USDC));
        assert!(!DENOM_CAPACITY.has(&storage, USDC));
    }

    #[test]
    fn test_set_invalid_limit_params_changes_nothing() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        let mut bad = usdc_params();
        bad.limiters[1].baseline_tvl_ppm = 0;
        let err = set_limit_params(&mut storage, &BTreeMap::new(), &bad).unwrap_err();
        assert_eq!(err, ContractError::InvalidBaselineTvlPpm { index: 1, ppm: 0 });
        assert_eq!(get_limit_params(&storage, USDC).unwrap(), usdc_params());
    }

    #[test]
    fn test_all_limit_params_sorted_by_denom() {
        let mut storage = MockStorage::new();
        for denom in ["uosmo", "uatom", "ibc/ABC", "stake"] {
            let params = LimitParams {
                denom: denom.to_string(),
                limiters: vec![limiter(60, 1, 1)],
            };
            set_limit_params(&mut storage, &BTreeMap::new(), &params).unwrap();
        }
        let denoms: Vec<String> = get_all_limit_params(&storage)
            .unwrap()
            .into_iter()
            .map(|p| p.denom)
            .collect();
        assert_eq!(denoms, vec!["ibc/ABC", "stake", "uatom", "uosmo"]);
    }

    #[test]
    fn test_withdrawal_debits_every_limiter() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        process_withdrawal(&mut storage, USDC, &amount(40_000_000_000)).unwrap();
        assert_eq!(
            capacity(&storage, USDC),
            vec![amount(60_000_000_000), amount(960_000_000_000)]
        );
    }

    #[test]
    fn test_withdrawal_is_all_or_nothing() {
        let mut storage = MockStorage::new();
        let params = LimitParams {
            denom: "uatom".to_string(),
            limiters: vec![limiter(3_600, 200_000_000, 1), limiter(86_400, 100_000_000, 1)],
        };
        set_limit_params(&mut storage, &BTreeMap::new(), &params).unwrap();

        let err = process_withdrawal(&mut storage, "uatom", &amount(105_000_000)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "withdrawal amount would exceed rate-limit capacity: denom = uatom, capacity(index: 1) = 100000000, amount = 105000000"
        );
        // The first limiter had room but was not debited
        assert_eq!(
            capacity(&storage, "uatom"),
            vec![amount(200_000_000), amount(100_000_000)]
        );
    }

    #[test]
    fn test_withdrawal_of_exact_capacity() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        process_withdrawal(&mut storage, USDC, &amount(100_000_000_000)).unwrap();
        assert_eq!(
            capacity(&storage, USDC),
            vec![BigAmount::zero(), amount(900_000_000_000)]
        );
        assert!(process_withdrawal(&mut storage, USDC, &amount(1)).is_err());
        assert!(process_withdrawal(&mut storage, USDC, &BigAmount::zero()).is_ok());
    }

    #[test]
    fn test_unlimited_denom_passes_without_writes() {
        let mut storage = MockStorage::new();
        process_withdrawal(&mut storage, "uatom", &amount(u128::MAX)).unwrap();
        process_deposit(&mut storage, "uatom", &amount(u128::MAX)).unwrap();
        assert!(!DENOM_CAPACITY.has(&storage, "uatom"));
    }

    #[test]
    fn test_deposit_credits_past_baseline() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        process_deposit(&mut storage, USDC, &amount(5_000_000_000)).unwrap();
        assert_eq!(
            capacity(&storage, USDC),
            vec![amount(105_000_000_000), amount(1_005_000_000_000)]
        );
    }

    #[test]
    fn test_drain_then_recover() {
        let mut storage = MockStorage::new();
        let params = LimitParams {
            denom: "uatom".to_string(),
            limiters: vec![limiter(3_600, 100_000_000_000, 1)],
        };
        set_limit_params(&mut storage, &BTreeMap::new(), &params).unwrap();
        let start = Timestamp::from_seconds(1_700_000_000);
        update_all_capacities(&mut storage, &BTreeMap::new(), start).unwrap();

        process_withdrawal(&mut storage, "uatom", &amount(50_000_000_000)).unwrap();
        assert_eq!(capacity(&storage, "uatom"), vec![amount(50_000_000_000)]);

        let err = process_withdrawal(&mut storage, "uatom", &amount(60_000_000_000)).unwrap_err();
        assert!(matches!(err, ContractError::WithdrawalExceedsCapacity { index: 0, .. }));
        assert_eq!(capacity(&storage, "uatom"), vec![amount(50_000_000_000)]);

        update_all_capacities(&mut storage, &BTreeMap::new(), start.plus_seconds(900)).unwrap();
        assert_eq!(capacity(&storage, "uatom"), vec![amount(75_000_000_000)]);

        update_all_capacities(&mut storage, &BTreeMap::new(), start.plus_seconds(1_800)).unwrap();
        assert_eq!(capacity(&storage, "uatom"), vec![amount(100_000_000_000)]);
    }

    #[test]
    fn test_first_update_only_records_time() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();
        process_withdrawal(&mut storage, USDC, &amount(1_000)).unwrap();
        let before = capacity(&storage, USDC);

        let now = Timestamp::from_seconds(100);
        let update = update_all_capacities(&mut storage, &BTreeMap::new(), now).unwrap();
        assert_eq!(update, CapacityUpdate::default());
        assert_eq!(capacity(&storage, USDC), before);
        assert_eq!(PREVIOUS_BLOCK_TIME.load(&storage).unwrap(), now);
    }

    #[test]
    fn test_non_positive_elapsed_changes_nothing() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();
        process_withdrawal(&mut storage, USDC, &amount(1_000)).unwrap();
        let now = Timestamp::from_seconds(100);
        update_all_capacities(&mut storage, &BTreeMap::new(), now).unwrap();
        let before = capacity(&storage, USDC);

        update_all_capacities(&mut storage, &BTreeMap::new(), now).unwrap();
        assert_eq!(capacity(&storage, USDC), before);

        update_all_capacities(&mut storage, &BTreeMap::new(), now.minus_seconds(10)).unwrap();
        assert_eq!(capacity(&storage, USDC), before);
        assert_eq!(PREVIOUS_BLOCK_TIME.load(&storage).unwrap(), now);
    }

    #[test]
    fn test_update_skips_corrupt_denom() {
        let mut storage = MockStorage::new();
        let atom = LimitParams {
            denom: "uatom".to_string(),
            limiters: vec![limiter(3_600, 100_000_000_000, 1)],
        };
        set_limit_params(&mut storage, &BTreeMap::new(), &atom).unwrap();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();
        process_withdrawal(&mut storage, "uatom", &amount(36_000_000_000)).unwrap();

        // Two limiters, one capacity
        DENOM_CAPACITY
            .save(
                &mut storage,
                USDC,
                &DenomCapacity {
                    denom: USDC.to_string(),
                    capacity_list: vec![amount(7)],
                },
            )
            .unwrap();

        let start = Timestamp::from_seconds(1_000);
        update_all_capacities(&mut storage, &BTreeMap::new(), start).unwrap();
        let update =
            update_all_capacities(&mut storage, &BTreeMap::new(), start.plus_seconds(36)).unwrap();

        assert_eq!(update.updated, vec!["uatom".to_string()]);
        assert_eq!(update.skipped, vec![USDC.to_string()]);
        assert_eq!(capacity(&storage, USDC), vec![amount(7)]);
        // 64e9 + 100e9 * 36 / 3600
        assert_eq!(capacity(&storage, "uatom"), vec![amount(65_000_000_000)]);
    }

    #[test]
    fn test_update_skips_denom_when_tvl_unavailable() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();
        process_withdrawal(&mut storage, USDC, &amount(1_000)).unwrap();
        let before = capacity(&storage, USDC);

        let start = Timestamp::from_seconds(1_000);
        update_all_capacities(&mut storage, &FailingTvl, start).unwrap();
        let update =
            update_all_capacities(&mut storage, &FailingTvl, start.plus_seconds(60)).unwrap();

        assert_eq!(update.skipped, vec![USDC.to_string()]);
        assert_eq!(capacity(&storage, USDC), before);
        assert_eq!(
            PREVIOUS_BLOCK_TIME.load(&storage).unwrap(),
            start.plus_seconds(60)
        );
    }

    #[test]
    fn test_update_follows_tvl() {
        let mut storage = MockStorage::new();
        set_limit_params(&mut storage, &BTreeMap::new(), &usdc_params()).unwrap();

        let start = Timestamp::from_seconds(1_000);
        update_all_capacities(&mut storage, &BTreeMap::new(), start).unwrap();

        // tvl grows to 50M: one full day refills both windows to the new baselines
        let grown = tvl(USDC, 50_000_000_000_000);
        update_all_capacities(&mut storage, &grown, start.plus_seconds(86_400)).unwrap();
        assert_eq!(
            capacity(&storage, USDC),
            vec![amount(500_000_000_000), amount(5_000_000_000_000)]
        );
    }
}
