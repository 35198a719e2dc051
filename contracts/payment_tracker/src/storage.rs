use soroban_sdk::{contracttype, Address, String, Symbol};

// Constants
pub const BASIS_POINTS: i128 = 10_000;
/// Days past due + grace before a schedule can be declared defaulted
pub const DEFAULT_DELAY: u64 = 30 * 86400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleStatus {
    /// Created, nothing received yet
    Scheduled = 0,
    /// Some money received, not yet due
    PartiallyPaid = 1,
    /// Fully paid; terminal once settled
    Paid = 2,
    /// Past due but inside the grace window
    InGracePeriod = 3,
    /// Past due and grace
    Overdue = 4,
    /// Declared defaulted; only exit is Recovered
    Defaulted = 5,
    /// Post-default recovery recorded; terminal once settled
    Recovered = 6,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PaymentSchedule {
    pub invoice_id: u64,
    pub expected_amount: i128,
    pub due_date: u64,
    /// Seconds past due_date before Overdue
    pub grace_period: u64,
    pub debtor: Address,
    pub total_paid: i128,
    pub status: ScheduleStatus,
    /// One-way; set when returns are distributed
    pub settled: bool,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorShare {
    pub investor: Address,
    /// Basis points of the distributable total; sums to 10,000 per invoice
    pub share_bps: u32,
}

/// One received payment; append-only, never mutated
#[contracttype]
#[derive(Clone, Debug)]
pub struct Payment {
    pub amount: i128,
    pub payer: Address,
    pub method: Symbol,
    pub reference: String,
    pub received_at: u64,
}

/// Post-default recovered amount; append-only
#[contracttype]
#[derive(Clone, Debug)]
pub struct Recovery {
    pub amount: i128,
    pub recorded_by: Address,
    pub recorded_at: u64,
}

/// One payout attempt to one investor; success=false means owed, not dropped
#[contracttype]
#[derive(Clone, Debug)]
pub struct Distribution {
    pub investor: Address,
    pub amount: i128,
    pub success: bool,
    pub distributed_at: u64,
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
    Manager(Address),
    Schedule(u64),           // invoice_id -> PaymentSchedule
    Investors(u64),          // invoice_id -> Vec<InvestorShare>
    Payment(u64, u32),       // (invoice_id, index) -> Payment
    PaymentCount(u64),
    Recovery(u64, u32),      // (invoice_id, index) -> Recovery
    RecoveryCount(u64),
    Distribution(u64, u32),  // (invoice_id, index) -> Distribution
    DistributionCount(u64),
}
