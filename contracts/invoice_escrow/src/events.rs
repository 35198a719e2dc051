use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositEvent {
    pub invoice_id: u64,
    pub payer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReleasedEvent {
    pub invoice_id: u64,
    pub holder: Address,
    pub amount: i128,
    pub fee: i128,
    /// True when the time-based permissionless path fired
    pub auto: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundedEvent {
    pub invoice_id: u64,
    pub payer: Address,
    pub amount: i128,
    /// True for the payer-initiated last-resort path
    pub emergency: bool,
}
