use crate::storage::BASIS_POINTS;

/// Platform fee on the settled total, truncating toward zero
///
/// Example:
/// - total_paid: 100,000
/// - fee: 100 bps (1%)
/// - fee amount: 1,000
pub fn platform_fee(total_paid: i128, fee_bps: i128) -> Option<i128> {
    total_paid.checked_mul(fee_bps)?.checked_div(BASIS_POINTS)
}

/// One investor's slice of the distributable total
///
/// Truncation can leave a few smallest units unassigned across a full
/// split; that dust stays in the contract.
pub fn investor_payout(distributable: i128, share_bps: u32) -> Option<i128> {
    distributable
        .checked_mul(share_bps as i128)?
        .checked_div(BASIS_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_at_100_bps() {
        assert_eq!(platform_fee(100_000, 100), Some(1_000));
    }

    #[test]
    fn test_two_investor_split() {
        // 100,000 paid, 1% fee, 6000/4000 bps
        let fee = platform_fee(100_000, 100).unwrap();
        let distributable = 100_000 - fee;
        assert_eq!(distributable, 99_000);
        assert_eq!(investor_payout(distributable, 6_000), Some(59_400));
        assert_eq!(investor_payout(distributable, 4_000), Some(39_600));
    }

    #[test]
    fn test_truncation_dust_stays_bounded() {
        // 3-way near-even split of an odd total
        let distributable = 99_999i128;
        let a = investor_payout(distributable, 3_333).unwrap();
        let b = investor_payout(distributable, 3_333).unwrap();
        let c = investor_payout(distributable, 3_334).unwrap();
        let paid = a + b + c;
        assert!(paid <= distributable);
        assert!(distributable - paid < 3);
    }

    #[test]
    fn test_zero_fee() {
        assert_eq!(platform_fee(100_000, 0), Some(0));
    }
}
