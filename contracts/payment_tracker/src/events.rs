use crate::storage::ScheduleStatus;
use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ScheduleCreatedEvent {
    pub invoice_id: u64,
    pub expected_amount: i128,
    pub due_date: u64,
    pub grace_period: u64,
    pub investor_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PaymentReceivedEvent {
    pub invoice_id: u64,
    pub payer: Address,
    pub amount: i128,
    pub method: Symbol,
    pub total_paid: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct StatusUpdatedEvent {
    pub invoice_id: u64,
    pub old_status: ScheduleStatus,
    pub new_status: ScheduleStatus,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DefaultedEvent {
    pub invoice_id: u64,
    pub unpaid_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RecoveryEvent {
    pub invoice_id: u64,
    pub amount: i128,
    pub recorded_by: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SettledEvent {
    pub invoice_id: u64,
    pub total_paid: i128,
    pub fee: i128,
    pub distributable: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DistributedEvent {
    pub invoice_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub success: bool,
}
