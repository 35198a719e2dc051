use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ListedEvent {
    pub invoice_id: u64,
    pub seller: Address,
    pub price: i128,
    pub shares: i128,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ListingSoldEvent {
    pub invoice_id: u64,
    pub seller: Address,
    pub buyer: Address,
    pub price: i128,
    pub fee: i128,
    pub refunded: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ListingCancelledEvent {
    pub invoice_id: u64,
    pub seller: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidPlacedEvent {
    pub invoice_id: u64,
    pub bidder: Address,
    pub amount: i128,
    pub outbid_refund: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidAcceptedEvent {
    pub invoice_id: u64,
    pub seller: Address,
    pub bidder: Address,
    pub amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidWithdrawnEvent {
    pub invoice_id: u64,
    pub bidder: Address,
    pub amount: i128,
}
