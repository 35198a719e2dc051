use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BASIS_POINTS: i128 = 10_000;
pub const SECONDS_PER_YEAR: u64 = 365 * 86400;

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolPosition {
    /// Proportional claim on total_assets
    pub shares: i128,
    /// Rewards folded in but not yet claimed
    pub accrued_reward: i128,
    /// Accrual clock; reset on claim and on any share change
    pub last_claim: u64,
    /// Refreshed on every deposit; drives the early-withdrawal penalty
    pub deposited_at: u64,
}

/// Risk/return rule used to route financing to compatible capital
#[contracttype]
#[derive(Clone, Debug)]
pub struct Strategy {
    pub id: u32,
    pub risk_level: u32,
    pub min_credit_score: u32,
    pub max_interest_rate_bps: i128,
    /// Maximum invoice duration in seconds this strategy accepts
    pub max_duration: u64,
    pub target_allocation_bps: i128,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Financing {
    pub invoice_id: u64,
    pub strategy_id: u32,
    pub amount: i128,
    /// Principal still owed back to the pool
    pub outstanding: i128,
    pub financed_at: u64,
}

/// Protocol-wide accounting for off-chain reconciliation
#[contracttype]
#[derive(Clone, Debug)]
pub struct Accounting {
    /// Cumulative stablecoin advanced to issuers
    pub total_financed: i128,
    /// Cumulative principal repaid
    pub total_repaid: i128,
    /// Cumulative repayment received above principal
    pub total_yield: i128,
}

/// Fee and limit knobs grouped so initialize stays readable
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolParams {
    pub deposit_fee_bps: i128,
    pub withdrawal_fee_bps: i128,
    pub performance_fee_bps: i128,
    pub early_penalty_bps: i128,
    /// Positions younger than this pay the early-withdrawal penalty
    pub min_lock_period: u64,
    pub pool_cap: i128,
    pub min_deposit: i128,
    pub max_deposit: i128,
}

/// Versioned configuration, rewritten whole on update
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    pub invoice_token: Address,
    pub stablecoin: Address,
    pub fee_recipient: Address,
    pub params: PoolParams,
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
    Manager(Address),
    Position(Address),
    TotalAssets,
    TotalSupply,
    TotalFinanced,
    PoolApyBps,
    Strategy(u32),
    StrategyCount,
    Financing(u64), // invoice_id -> Financing
    Accounting,
}
