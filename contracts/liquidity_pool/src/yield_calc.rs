use crate::storage::{BASIS_POINTS, SECONDS_PER_YEAR};

/// Pool shares minted for a net deposit at the current ratio (1:1 when the
/// pool is empty)
pub fn shares_for_deposit(amount: i128, total_assets: i128, total_supply: i128) -> Option<i128> {
    if total_supply == 0 || total_assets == 0 {
        return Some(amount);
    }
    amount.checked_mul(total_supply)?.checked_div(total_assets)
}

/// Asset value of a share count at the current ratio
pub fn assets_for_shares(shares: i128, total_assets: i128, total_supply: i128) -> Option<i128> {
    if total_supply == 0 {
        return Some(0);
    }
    shares.checked_mul(total_assets)?.checked_div(total_supply)
}

/// Holder's slice of the pool in basis points
pub fn user_share_bps(shares: i128, total_supply: i128) -> Option<i128> {
    if total_supply == 0 {
        return Some(0);
    }
    shares.checked_mul(BASIS_POINTS)?.checked_div(total_supply)
}

/// Reward accrued over an interval:
/// user_assets * apy * elapsed / 365 days, all in bps space
pub fn accrued_over(user_assets: i128, apy_bps: i128, elapsed: u64) -> Option<i128> {
    user_assets
        .checked_mul(apy_bps)?
        .checked_mul(elapsed as i128)?
        .checked_div(SECONDS_PER_YEAR as i128)?
        .checked_div(BASIS_POINTS)
}

/// Share of assets currently lent out
pub fn utilization_bps(total_financed: i128, total_assets: i128) -> i128 {
    if total_assets <= 0 {
        return 0;
    }
    total_financed
        .checked_mul(BASIS_POINTS)
        .and_then(|v| v.checked_div(total_assets))
        .unwrap_or(0)
}

/// Fixed step table: yield is a deterministic function of pool usage
pub fn apy_for_utilization(utilization: i128) -> i128 {
    if utilization < 2_500 {
        300
    } else if utilization < 5_000 {
        500
    } else if utilization < 7_500 {
        800
    } else {
        1_200
    }
}
