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
    /// Caller is not the debtor, current claim-holder or admin
    Unauthorized = 10,
    /// Only the original payer may emergency-refund
    NotPayer = 11,

    // ============================================
    // DEPOSIT ERRORS (20-29)
    // ============================================
    /// No deposit for this invoice
    DepositNotFound = 20,
    /// A live deposit already exists for this invoice
    DepositExists = 21,
    /// Deposit already released
    AlreadyReleased = 22,
    /// Deposit already refunded
    AlreadyRefunded = 23,
    /// Invoice unverified
    NotVerified = 24,
    /// Invoice already paid
    InvoicePaid = 25,

    // ============================================
    // AMOUNT ERRORS (30-39)
    /// Amount must be positive
    InvalidAmount = 30,
    /// Deposit below the invoice face value
    BelowFaceValue = 31,

    // ============================================
    // TIME ERRORS (40-49)
    // ============================================
    /// Release or refund window not yet open
    TooEarly = 40,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
    /// Re-entrant call rejected
    Reentry = 51,
}
