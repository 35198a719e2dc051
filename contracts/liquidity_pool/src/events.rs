use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolDepositEvent {
    pub investor: Address,
    pub amount: i128,
    pub fee: i128,
    pub shares_minted: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolWithdrawalEvent {
    pub investor: Address,
    pub shares_burned: i128,
    pub assets: i128,
    pub fee: i128,
    pub penalty: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardsClaimedEvent {
    pub investor: Address,
    pub gross: i128,
    pub fee: i128,
    pub net: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct StrategyAddedEvent {
    pub strategy_id: u32,
    pub risk_level: u32,
    pub min_credit_score: u32,
    pub max_duration: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct InvoiceFinancedEvent {
    pub invoice_id: u64,
    pub strategy_id: u32,
    pub amount: i128,
    pub issuer: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RepaymentEvent {
    pub invoice_id: u64,
    pub amount: i128,
    pub principal: i128,
    pub yield_amount: i128,
    pub outstanding: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ApyUpdatedEvent {
    pub utilization_bps: i128,
    pub apy_bps: i128,
}
