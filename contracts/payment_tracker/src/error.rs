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
    // SCHEDULE ERRORS (20-29)
    // ============================================
    /// No schedule for this invoice
    ScheduleNotFound = 20,
    /// A schedule already exists for this invoice
    ScheduleExists = 21,
    /// Schedule already settled; distribution never runs twice
    AlreadySettled = 22,
    /// Operation invalid for the schedule's current status
    InvalidStatus = 23,
    /// total_paid below expected_amount
    NotFullyPaid = 24,
    /// Schedule already declared defaulted
    AlreadyDefaulted = 25,
    /// Invoice unverified
    NotVerified = 26,

    // ============================================
    // AMOUNT ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// Investor shares must sum to exactly 10,000 bps
    InvalidShareSplit = 31,
    /// Investor list must not be empty
    NoInvestors = 32,

    // ============================================
    // TIME ERRORS (40-49)
    // ============================================
    /// Default window not yet open
    TooEarly = 40,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
    /// Re-entrant call rejected
    Reentry = 51,
}
