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
    /// Caller lacks the required role
    Unauthorized = 10,
    /// Caller is not a registered operator contract
    NotOperator = 11,

    // ============================================
    // RECORD ERRORS (20-29)
    // ============================================
    /// Invoice not found
    InvoiceNotFound = 20,
    /// An invoice with this external id already exists
    DuplicateExternalId = 21,
    /// Invoice already verified
    AlreadyVerified = 22,
    /// Invoice not yet verified
    NotVerified = 23,
    /// Invoice already marked paid
    AlreadyPaid = 24,
    /// Invoice already settled (terminal)
    AlreadySettled = 25,

    // ============================================
    // AMOUNT ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// total_shares out of range (0, MAX_TOTAL_SHARES]
    InvalidShareCount = 31,
    /// Transfer exceeds holder balance
    InsufficientShares = 32,

    // ============================================
    // TIME ERRORS (40-49)
    // ============================================
    /// Due date must be in the future
    DueDateNotFuture = 40,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
}
