use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BASIS_POINTS: i128 = 10_000; // 100% = 10,000 basis points
pub const MAX_TOTAL_SHARES: i128 = 1_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Admin = 0,
    Verifier = 1,
    Manager = 2,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Invoice {
    /// Auto-incremented unique ID
    pub id: u64,
    /// Off-ledger invoice reference, unique across all records
    pub external_id: String,
    /// Face value in smallest stablecoin units
    pub face_value: i128,
    /// Fixed fractional supply minted at tokenization
    pub total_shares: i128,
    /// Unix timestamp the debtor must pay by
    pub due_date: u64,
    /// Business that tokenized the invoice; receives all shares at mint
    pub issuer: Address,
    /// Party expected to pay the invoice
    pub debtor: Address,
    /// Free-form industry tag for strategy matching
    pub industry: String,
    /// Ledger timestamp at tokenization
    pub created_at: u64,
    /// Set once by an authorized verifier
    pub verified: bool,
    /// Set by the escrow or payment-tracker path
    pub paid: bool,
    /// Terminal; set when returns are distributed
    pub settled: bool,
}

/// Versioned fee configuration, rewritten whole on update
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    pub fee_recipient: Address,
    pub transfer_fee_bps: i128,
    pub version: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Initialized,
    Paused,
    Operator(Address),
    Role(Address, Role),
    Invoice(u64),
    InvoiceCounter,
    ExternalId(String),          // external_id -> invoice id
    Balance(u64, Address),       // (invoice_id, holder)
    Holders(u64),                // invoice_id -> Vec<Address> with non-zero balance
}
