use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller not authorized for this operation
    Unauthorized = 10,
    /// Buyer and seller are the same address
    SelfPurchase = 11,
    /// Seller may not bid on their own listing
    SelfBid = 12,

    // ============================================
    // LISTING ERRORS (20-29)
    // ============================================
    /// No listing for this invoice
    ListingNotFound = 20,
    /// A listing for this invoice is already active
    ListingActive = 21,
    /// Listing inactive (sold, accepted or cancelled)
    ListingInactive = 22,
    /// Listing past its expiry time
    ListingExpired = 23,
    /// Invoice unverified or already paid
    NotListable = 24,
    /// Seller holds no shares of this invoice
    NoShares = 25,

    // ============================================
    // BID ERRORS (30-39)
    // ============================================
    /// No bid from this bidder on this invoice
    BidNotFound = 30,
    /// Bid does not strictly exceed the current highest
    BidTooLow = 31,
    /// Bid already withdrawn or consumed
    BidInactive = 32,
    /// The current highest bid is live auction collateral
    CannotWithdrawHighest = 33,
    /// No live highest bid to accept
    NoHighestBid = 34,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Payment below the asking price
    InsufficientPayment = 41,
    /// Listing duration zero or above the 365-day cap
    InvalidDuration = 42,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
    /// Re-entrant call rejected
    Reentry = 51,
}
