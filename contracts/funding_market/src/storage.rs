use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BASIS_POINTS: i128 = 10_000;
pub const MAX_LISTING_DURATION: u64 = 365 * 86400; // 365 days

#[contracttype]
#[derive(Clone, Debug)]
pub struct Listing {
    pub invoice_id: u64,
    pub seller: Address,
    /// Asking price in stablecoin units for the seller's whole stake
    pub price: i128,
    /// Seller's share balance captured at listing time
    pub shares: i128,
    /// Cleared on sale, acceptance or cancellation; never set back
    pub active: bool,
    pub created_at: u64,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Bid {
    pub invoice_id: u64,
    pub bidder: Address,
    /// Stablecoin amount escrowed in this contract while the bid is active
    pub amount: i128,
    pub active: bool,
}

/// Versioned fee configuration, rewritten whole on update
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    pub invoice_token: Address,
    pub stablecoin: Address,
    pub fee_recipient: Address,
    pub platform_fee_bps: i128,
    pub version: u32,
}

/// Mirror of the registry's invoice record for cross-contract decoding
#[contracttype]
#[derive(Clone, Debug)]
pub struct Invoice {
    pub id: u64,
    pub external_id: String,
    pub face_value: i128,
    pub total_shares: i128,
    pub due_date: u64,
    pub issuer: Address,
    pub debtor: Address,
    pub industry: String,
    pub created_at: u64,
    pub verified: bool,
    pub paid: bool,
    pub settled: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Initialized,
    Paused,
    ReentryGuard,
    Listing(u64),            // invoice_id -> Listing (at most one live)
    Bid(u64, Address),       // (invoice_id, bidder) -> Bid
    HighestBidder(u64),      // invoice_id -> current highest bidder
}
