use soroban_sdk::{contracttype, Address, String};

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenizedEvent {
    pub invoice_id: u64,
    pub external_id: String,
    pub issuer: Address,
    pub debtor: Address,
    pub face_value: i128,
    pub total_shares: i128,
    pub due_date: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VerifiedEvent {
    pub invoice_id: u64,
    pub verifier: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ShareTransferEvent {
    pub invoice_id: u64,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct InvoicePaidEvent {
    pub invoice_id: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct InvoiceSettledEvent {
    pub invoice_id: u64,
}
