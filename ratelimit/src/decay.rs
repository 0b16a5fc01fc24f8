//! Continuous capacity recovery and decay.
//!
//! Between two blocks every capacity moves toward its baseline by
//! `max(baseline, |capacity - baseline|) * elapsed / period`, so a fully
//! drained window refills in one period and an over-full window (left behind
//! by a TVL drop) bleeds off at least as fast.

use std::cmp::max;

use common::BigAmount;
use num_bigint::BigUint;

use crate::baseline::get_baseline;
use crate::error::ContractError;
use crate::state::LimitParams;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Compute the capacity list after `elapsed_nanos` have passed.
///
/// `prev_capacity_list` must be positionally aligned with
/// `limit_params.limiters`.
pub fn calculate_new_capacity_list(
    tvl: &BigAmount,
    limit_params: &LimitParams,
    prev_capacity_list: &[BigAmount],
    elapsed_nanos: u64,
) -> Result<Vec<BigAmount>, ContractError> {
    if prev_capacity_list.len() != limit_params.limiters.len() {
        return Err(ContractError::CapacityListLengthMismatch {
            denom: limit_params.denom.clone(),
            capacities: prev_capacity_list.len(),
            limiters: limit_params.limiters.len(),
        });
    }

    let elapsed = BigUint::from(elapsed_nanos);
    Ok(limit_params
        .limiters
        .iter()
        .zip(prev_capacity_list)
        .map(|(limiter, capacity)| {
            let baseline = get_baseline(tvl, limiter);
            let period = BigUint::from(limiter.period_seconds) * BigUint::from(NANOS_PER_SECOND);
            BigAmount::from(step_toward_baseline(
                capacity.as_biguint(),
                baseline.as_biguint(),
                &elapsed,
                &period,
            ))
        })
        .collect())
}

fn step_toward_baseline(
    capacity: &BigUint,
    baseline: &BigUint,
    elapsed: &BigUint,
    period: &BigUint,
) -> BigUint {
    let above = capacity >= baseline;
    let distance = if above {
        capacity - baseline
    } else {
        baseline - capacity
    };

    let magnitude = max(baseline, &distance) * elapsed / period;
    if distance <= magnitude {
        return baseline.clone();
    }
    if above {
        capacity - magnitude
    } else {
        capacity + magnitude
    }
}
