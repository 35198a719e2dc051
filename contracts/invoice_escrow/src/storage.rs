use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BASIS_POINTS: i128 = 10_000;
/// Anyone may trigger release this long after the invoice due date
pub const AUTO_RELEASE_GRACE: u64 = 7 * 86400;

#[contracttype]
#[derive(Clone, Debug)]
pub struct EscrowDeposit {
    pub invoice_id: u64,
    pub payer: Address,
    pub amount: i128,
    pub deposited_at: u64,
    /// Terminal; mutually exclusive with refunded
    pub released: bool,
    /// Terminal; mutually exclusive with released
    pub refunded: bool,
}

/// Versioned fee/timeout configuration, rewritten whole on update
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    pub invoice_token: Address,
    pub stablecoin: Address,
    pub fee_recipient: Address,
    pub escrow_fee_bps: i128,
    /// Seconds after deposit before anyone may auto-release
    pub escrow_timeout: u64,
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
    Deposit(u64), // invoice_id -> EscrowDeposit (at most one live)
}
