//! Capacity baseline computation.

use std::cmp::max;

use common::BigAmount;
use num_bigint::BigUint;

use crate::state::{Limiter, PPM_DENOMINATOR};

/// `max(baseline_minimum, floor(tvl * baseline_tvl_ppm / 1_000_000))`
///
/// Integer arithmetic only, so every node computes the same value.
pub fn get_baseline(tvl: &BigAmount, limiter: &Limiter) -> BigAmount {
    let scaled = tvl.as_biguint() * BigUint::from(limiter.baseline_tvl_ppm)
        / BigUint::from(PPM_DENOMINATOR);
    max(BigAmount::from(scaled), limiter.baseline_minimum.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(minimum: u128, ppm: u32) -> Limiter {
        Limiter {
            period_seconds: 3_600,
            baseline_minimum: BigAmount::from(minimum),
            baseline_tvl_ppm: ppm,
        }
    }

    #[test]
    fn test_zero_tvl_uses_minimum() {
        let baseline = get_baseline(&BigAmount::zero(), &limiter(100_000_000_000, 10_000));
        assert_eq!(baseline, BigAmount::from(100_000_000_000u128));
    }

    #[test]
    fn test_tvl_share_above_minimum() {
        // 50M tokens (6 decimals): 1% = 500k, 10% = 5M
        let tvl = BigAmount::from(50_000_000_000_000u128);
        assert_eq!(
            get_baseline(&tvl, &limiter(100_000_000_000, 10_000)),
            BigAmount::from(500_000_000_000u128)
        );
        assert_eq!(
            get_baseline(&tvl, &limiter(1_000_000_000_000, 100_000)),
            BigAmount::from(5_000_000_000_000u128)
        );
    }

    #[test]
    fn test_higher_ppm_shares() {
        // 50M tokens at 5% and 20%
        let tvl = BigAmount::from(50_000_000_000_000u128);
        assert_eq!(
            get_baseline(&tvl, &limiter(1, 50_000)),
            BigAmount::from(2_500_000_000_000u128)
        );
        assert_eq!(
            get_baseline(&tvl, &limiter(1, 200_000)),
            BigAmount::from(10_000_000_000_000u128)
        );
        // One unit short of the next whole share
        let tvl = BigAmount::from(50_000_000_000_019u128);
        assert_eq!(
            get_baseline(&tvl, &limiter(1, 50_000)),
            BigAmount::from(2_500_000_000_000u128)
        );
    }

    #[test]
    fn test_rounds_down() {
        // 999_999 * 1 / 1_000_000 = 0.999999 -> 0 -> minimum
        let baseline = get_baseline(&BigAmount::from(999_999u128), &limiter(1, 1));
        assert_eq!(baseline, BigAmount::from(1u128));

        // 1_234_567 * 333_333 / 1e6 = 411_521.92... -> 411_521
        let baseline = get_baseline(&BigAmount::from(1_234_567u128), &limiter(1, 333_333));
        assert_eq!(baseline, BigAmount::from(411_521u128));
    }

    #[test]
    fn test_monotonic_in_tvl() {
        let l = limiter(1_000, 250_000);
        let mut previous = BigAmount::zero();
        for tvl in [0u128, 1, 3_999, 4_000, 4_001, 10_000, 1_000_000, u128::MAX] {
            let baseline = get_baseline(&BigAmount::from(tvl), &l);
            assert!(baseline >= previous);
            assert!(baseline >= l.baseline_minimum);
            previous = baseline;
        }
    }

    #[test]
    fn test_no_overflow_past_u128() {
        let tvl = BigAmount::from(u128::MAX);
        let baseline = get_baseline(&tvl, &limiter(1, 1_000_000));
        assert_eq!(baseline, tvl);
    }
}
