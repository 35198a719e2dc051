use crate::storage::BASIS_POINTS;

/// Platform fee on a sale or accepted bid, truncating toward zero
pub fn platform_fee(amount: i128, fee_bps: i128) -> Option<i128> {
    amount.checked_mul(fee_bps)?.checked_div(BASIS_POINTS)
}

/// What the seller receives after the platform fee
pub fn seller_proceeds(amount: i128, fee_bps: i128) -> Option<i128> {
    amount.checked_sub(platform_fee(amount, fee_bps)?)
}
