// programs/tempest_core/src/shares.rs
//
// Proportional Share Math
// =======================
//
// Share price = total pool assets / total shares, always computed from the
// totals passed in by the caller. Nothing here caches a price.
//
// Rounding always favours the pool:
// - deposits mint shares rounded down
// - redeemable value of shares is rounded down
// - shares required to withdraw an asset amount are rounded up

use crate::limits::BPS_DENOMINATOR;

/// floor(a * b / denom) using a 128-bit intermediate.
/// None if denom is zero or the result does not fit in u64.
pub fn mul_div_floor(a: u64, b: u64, denom: u64) -> Option<u64> {
    if denom == 0 {
        return None;
    }
    let value = (a as u128).checked_mul(b as u128)? / denom as u128;
    u64::try_from(value).ok()
}

/// ceil(a * b / denom) using a 128-bit intermediate.
pub fn mul_div_ceil(a: u64, b: u64, denom: u64) -> Option<u64> {
    if denom == 0 {
        return None;
    }
    let product = (a as u128).checked_mul(b as u128)?;
    let denom = denom as u128;
    let value = product / denom + u128::from(product % denom != 0);
    u64::try_from(value).ok()
}

/// Fee charged on `amount` at `fee_bps` (rounded down).
pub fn fee_from_bps(amount: u64, fee_bps: u16) -> u64 {
    // fee_bps <= 10000 keeps the result <= amount
    mul_div_floor(amount, fee_bps as u64, BPS_DENOMINATOR).unwrap_or(0)
}

/// Shares minted for a net deposit of `assets`.
///
/// Bootstraps at 1:1 while no shares exist. A drained pool (shares left, no
/// assets) is priced as if it held one asset unit, so recapitalizing it leaves
/// the worthless shares with less than one unit of the new deposit.
pub fn shares_for_deposit(assets: u64, total_assets: u64, total_shares: u64) -> Option<u64> {
    if total_shares == 0 {
        return Some(assets);
    }
    mul_div_floor(assets, total_shares, total_assets.max(1))
}

/// Current redeemable asset value of `shares`.
pub fn assets_for_shares(shares: u64, total_assets: u64, total_shares: u64) -> Option<u64> {
    if total_shares == 0 {
        return Some(0);
    }
    mul_div_floor(shares, total_assets, total_shares)
}

/// Shares that must be given up to take `assets` out of the pool.
///
/// 1:1 while no shares exist. None when shares exist but the pool is empty
/// (no finite share count buys a non-zero amount).
pub fn shares_for_withdraw(assets: u64, total_assets: u64, total_shares: u64) -> Option<u64> {
    if total_shares == 0 {
        return Some(assets);
    }
    if assets == 0 {
        return Some(0);
    }
    if total_assets == 0 {
        return None;
    }
    mul_div_ceil(assets, total_shares, total_assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== MUL DIV TESTS ====================

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div_floor(10, 3, 4), Some(7)); // 7.5
        assert_eq!(mul_div_ceil(10, 3, 4), Some(8));
        assert_eq!(mul_div_ceil(10, 4, 4), Some(10)); // exact, no bump
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(mul_div_floor(1, 1, 0), None);
        assert_eq!(mul_div_ceil(1, 1, 0), None);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // u64::MAX * u64::MAX overflows u64 but not u128
        assert_eq!(mul_div_floor(u64::MAX, u64::MAX, u64::MAX), Some(u64::MAX));
        // Result itself too large
        assert_eq!(mul_div_floor(u64::MAX, 2, 1), None);
    }

    // ==================== FEE TESTS ====================

    #[test]
    fn test_fee_from_bps() {
        assert_eq!(fee_from_bps(1_000_000, 50), 5_000); // 0.5%
        assert_eq!(fee_from_bps(1_000_000, 0), 0);
        assert_eq!(fee_from_bps(199, 50), 0); // rounds down to zero
        assert_eq!(fee_from_bps(1_000, 10_000), 1_000);
    }

    // ==================== SHARE CONVERSION TESTS ====================

    #[test]
    fn test_bootstrap_is_one_to_one() {
        assert_eq!(shares_for_deposit(1_000_000, 0, 0), Some(1_000_000));
        assert_eq!(shares_for_withdraw(10_000, 0, 0), Some(10_000));
        assert_eq!(assets_for_shares(10_000, 0, 0), Some(0));
    }

    #[test]
    fn test_deposit_after_appreciation_mints_fewer_shares() {
        // Pool earned 10% in premiums: 1.1M assets over 1M shares
        let minted = shares_for_deposit(110_000, 1_100_000, 1_000_000).unwrap();
        assert_eq!(minted, 100_000);
    }

    #[test]
    fn test_deposit_into_drained_pool_prices_at_one_unit() {
        assert_eq!(shares_for_deposit(1_000, 0, 500), Some(500_000));

        // Old holders end up with 500 of 500,500 shares over 1,000 assets
        let value = assets_for_shares(500, 1_000, 500_500).unwrap();
        assert_eq!(value, 0);
    }

    #[test]
    fn test_deposit_into_drained_pool_overflow() {
        assert_eq!(shares_for_deposit(u64::MAX, 0, 2), None);
    }

    #[test]
    fn test_withdraw_rounds_up() {
        // 3 assets over 2 shares -> 1 asset costs 2/3 share, rounded up to 1
        assert_eq!(shares_for_withdraw(1, 3, 2), Some(1));
        // 2 assets of a 3:2 pool cost 4/3 -> 2 shares
        assert_eq!(shares_for_withdraw(2, 3, 2), Some(2));
    }

    #[test]
    fn test_withdraw_from_empty_pool_with_shares() {
        assert_eq!(shares_for_withdraw(1, 0, 100), None);
        assert_eq!(shares_for_withdraw(0, 0, 100), Some(0));
    }

    #[test]
    fn test_redeemable_value_after_losses() {
        // 450k paid out of a 1M pool without burning shares
        let value = assets_for_shares(100_000, 550_000, 1_000_000).unwrap();
        assert_eq!(value, 55_000);
    }

    #[test]
    fn test_withdraw_of_redeemable_value_fits_in_shares() {
        // The floor value of a share block never costs more than the block
        let (assets, shares) = (1_234_567u64, 1_000_003u64);
        for block in [1u64, 7, 999, 123_456] {
            let value = assets_for_shares(block, assets, shares).unwrap();
            let cost = shares_for_withdraw(value, assets, shares).unwrap();
            assert!(cost <= block, "block {} cost {}", block, cost);
        }
    }
}
