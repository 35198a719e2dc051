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
    /// Caller is not a manager or the admin
    Unauthorized = 10,

    // ============================================
    // ENTITY ERRORS (20-29)
    // ============================================
    /// No position for this investor
    PositionNotFound = 20,
    /// Unknown strategy id
    StrategyNotFound = 21,
    /// No financing recorded for this invoice
    FinancingNotFound = 22,
    /// Invoice already financed by the pool
    FinancingExists = 23,
    /// Invoice unverified or already paid
    NotFinanceable = 24,
    /// No active strategy accepts this credit score and duration
    NoMatchingStrategy = 25,
    /// Financing principal already fully repaid
    AlreadyRepaid = 26,

    // ============================================
    // AMOUNT ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// Deposit below the per-asset minimum
    BelowMinDeposit = 31,
    /// Deposit above the per-asset maximum
    AboveMaxDeposit = 32,
    /// Deposit would push assets past the pool cap
    PoolCapExceeded = 33,
    /// Withdrawal exceeds the position's share balance
    InsufficientShares = 34,
    /// Pool cash cannot cover this payout right now
    InsufficientLiquidity = 35,
    /// No pending reward to claim
    NothingToClaim = 36,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
    /// Re-entrant call rejected
    Reentry = 51,
}
