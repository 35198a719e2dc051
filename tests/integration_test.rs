#![cfg(test)]

use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    token, vec, Address, Env, String, Symbol,
};

// Re-export contract clients
mod invoice_token {
    soroban_sdk::contractimport!(
        file = "../target/wasm32-unknown-unknown/release/invoice_token.wasm"
    );
}

mod funding_market {
    soroban_sdk::contractimport!(
        file = "../target/wasm32-unknown-unknown/release/funding_market.wasm"
    );
}

mod invoice_escrow {
    soroban_sdk::contractimport!(
        file = "../target/wasm32-unknown-unknown/release/invoice_escrow.wasm"
    );
}

mod payment_tracker {
    soroban_sdk::contractimport!(
        file = "../target/wasm32-unknown-unknown/release/payment_tracker.wasm"
    );
}

mod liquidity_pool {
    soroban_sdk::contractimport!(
        file = "../target/wasm32-unknown-unknown/release/liquidity_pool.wasm"
    );
}

const DAY: u64 = 86400;

struct TestContext {
    env: Env,
    verifier: Address,
    manager: Address,
    issuer: Address,
    debtor: Address,
    investor_a: Address,
    investor_b: Address,
    stablecoin: Address,
    registry_id: Address,
    market_id: Address,
    escrow_id: Address,
    tracker_id: Address,
    pool_id: Address,
}

fn setup_test() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    env.ledger().set(LedgerInfo {
        timestamp: 1_000_000,
        protocol_version: 22,
        sequence_number: 10,
        network_id: Default::default(),
        base_reserve: 10,
        min_temp_entry_ttl: 10,
        min_persistent_entry_ttl: 10,
        max_entry_ttl: 3_110_400,
    });

    let admin = Address::generate(&env);
    let verifier = Address::generate(&env);
    let manager = Address::generate(&env);
    let fee_recipient = Address::generate(&env);
    let issuer = Address::generate(&env);
    let debtor = Address::generate(&env);
    let investor_a = Address::generate(&env);
    let investor_b = Address::generate(&env);

    // Stablecoin via the Stellar Asset Contract
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    let stablecoin = sac.address();
    let stablecoin_admin = token::StellarAssetClient::new(&env, &stablecoin);
    stablecoin_admin.mint(&debtor, &1_000_000i128);
    stablecoin_admin.mint(&investor_a, &1_000_000i128);
    stablecoin_admin.mint(&investor_b, &1_000_000i128);

    // Registry
    let registry_id = env.register_contract_wasm(None, invoice_token::WASM);
    let registry = invoice_token::Client::new(&env, &registry_id);
    registry.initialize(&admin, &fee_recipient, &0i128);
    registry.set_role(&verifier, &invoice_token::Role::Verifier, &true);

    // Marketplace
    let market_id = env.register_contract_wasm(None, funding_market::WASM);
    let market = funding_market::Client::new(&env, &market_id);
    market.initialize(&admin, &registry_id, &stablecoin, &fee_recipient, &250i128);
    registry.add_operator(&market_id);

    // Escrow
    let escrow_id = env.register_contract_wasm(None, invoice_escrow::WASM);
    let escrow = invoice_escrow::Client::new(&env, &escrow_id);
    escrow.initialize(
        &admin,
        &registry_id,
        &stablecoin,
        &fee_recipient,
        &100i128,
        &(30 * DAY),
    );
    registry.add_operator(&escrow_id);

    // Payment tracker
    let tracker_id = env.register_contract_wasm(None, payment_tracker::WASM);
    let tracker = payment_tracker::Client::new(&env, &tracker_id);
    tracker.initialize(&admin, &registry_id, &stablecoin, &fee_recipient, &100i128);
    tracker.set_manager(&manager, &true);
    registry.add_operator(&tracker_id);

    // Liquidity pool
    let pool_id = env.register_contract_wasm(None, liquidity_pool::WASM);
    let pool = liquidity_pool::Client::new(&env, &pool_id);
    pool.initialize(
        &admin,
        &registry_id,
        &stablecoin,
        &fee_recipient,
        &liquidity_pool::PoolParams {
            deposit_fee_bps: 0,
            withdrawal_fee_bps: 0,
            performance_fee_bps: 1_000,
            early_penalty_bps: 500,
            min_lock_period: 30 * DAY,
            pool_cap: 10_000_000,
            min_deposit: 100,
            max_deposit: 1_000_000,
        },
    );
    pool.set_manager(&manager, &true);
    registry.add_operator(&pool_id);

    TestContext {
        env,
        verifier,
        manager,
        issuer,
        debtor,
        investor_a,
        investor_b,
        stablecoin,
        registry_id,
        market_id,
        escrow_id,
        tracker_id,
        pool_id,
    }
}

#[test]
fn test_full_financing_lifecycle() {
    let ctx = setup_test();
    let registry = invoice_token::Client::new(&ctx.env, &ctx.registry_id);
    let market = funding_market::Client::new(&ctx.env, &ctx.market_id);
    let tracker = payment_tracker::Client::new(&ctx.env, &ctx.tracker_id);
    let stablecoin = token::Client::new(&ctx.env, &ctx.stablecoin);

    // Issuer tokenizes a 100,000 invoice into 10,000 shares
    let invoice_id = registry.tokenize(
        &ctx.issuer,
        &String::from_str(&ctx.env, "INV-2024-0001"),
        &100_000i128,
        &10_000i128,
        &(ctx.env.ledger().timestamp() + 45 * DAY),
        &ctx.debtor,
        &String::from_str(&ctx.env, "logistics"),
    );
    registry.verify(&ctx.verifier, &invoice_id);

    // Investor A buys the whole stake off the marketplace
    market.list_for_sale(&ctx.issuer, &invoice_id, &95_000i128, &(14 * DAY));
    market.buy_listing(&ctx.investor_a, &invoice_id, &95_000i128);

    assert_eq!(registry.balance_of(&invoice_id, &ctx.investor_a), 10_000);
    // 95,000 minus the 2.5% platform fee
    assert_eq!(stablecoin.balance(&ctx.issuer), 92_625);

    // A passes 40% of the claim to investor B
    registry.transfer(&invoice_id, &ctx.investor_a, &ctx.investor_b, &4_000i128);
    assert_eq!(registry.balance_of(&invoice_id, &ctx.investor_b), 4_000);

    // Manager schedules repayment for the two claim-holders
    let investors = vec![
        &ctx.env,
        payment_tracker::InvestorShare {
            investor: ctx.investor_a.clone(),
            share_bps: 6_000,
        },
        payment_tracker::InvestorShare {
            investor: ctx.investor_b.clone(),
            share_bps: 4_000,
        },
    ];
    tracker.create_schedule(
        &ctx.manager,
        &invoice_id,
        &100_000i128,
        &(ctx.env.ledger().timestamp() + 45 * DAY),
        &(5 * DAY),
        &investors,
    );

    // Debtor pays in two installments; the second settles and distributes
    // in the same step
    tracker.record_payment(
        &invoice_id,
        &ctx.debtor,
        &60_000i128,
        &Symbol::new(&ctx.env, "bank"),
        &String::from_str(&ctx.env, "wire-0001"),
    );
    let schedule = tracker.get_schedule(&invoice_id);
    assert_eq!(
        schedule.status,
        payment_tracker::ScheduleStatus::PartiallyPaid
    );

    tracker.record_payment(
        &invoice_id,
        &ctx.debtor,
        &40_000i128,
        &Symbol::new(&ctx.env, "bank"),
        &String::from_str(&ctx.env, "wire-0002"),
    );

    let schedule = tracker.get_schedule(&invoice_id);
    assert_eq!(schedule.status, payment_tracker::ScheduleStatus::Paid);
    assert!(schedule.settled);

    // fee 1,000 -> distributable 99,000 at 6000/4000 bps
    assert_eq!(
        stablecoin.balance(&ctx.investor_a),
        1_000_000 - 95_000 + 59_400
    );
    assert_eq!(stablecoin.balance(&ctx.investor_b), 1_000_000 + 39_600);

    let invoice = registry.get_invoice(&invoice_id);
    assert!(invoice.paid);
    assert!(invoice.settled);
}

#[test]
fn test_auction_outbid_and_refund() {
    let ctx = setup_test();
    let registry = invoice_token::Client::new(&ctx.env, &ctx.registry_id);
    let market = funding_market::Client::new(&ctx.env, &ctx.market_id);
    let stablecoin = token::Client::new(&ctx.env, &ctx.stablecoin);

    let invoice_id = registry.tokenize(
        &ctx.issuer,
        &String::from_str(&ctx.env, "INV-2024-0002"),
        &60_000i128,
        &6_000i128,
        &(ctx.env.ledger().timestamp() + 30 * DAY),
        &ctx.debtor,
        &String::from_str(&ctx.env, "retail"),
    );
    registry.verify(&ctx.verifier, &invoice_id);

    market.list_for_sale(&ctx.issuer, &invoice_id, &55_000i128, &(14 * DAY));

    market.place_bid(&ctx.investor_a, &invoice_id, &50_000i128);
    market.place_bid(&ctx.investor_b, &invoice_id, &52_000i128);

    // A was made whole when B outbid
    assert_eq!(stablecoin.balance(&ctx.investor_a), 1_000_000);

    market.accept_bid(&invoice_id);

    // 52,000 minus the 2.5% platform fee
    assert_eq!(stablecoin.balance(&ctx.issuer), 50_700);
    assert_eq!(registry.balance_of(&invoice_id, &ctx.investor_b), 6_000);
}

#[test]
fn test_escrow_path() {
    let ctx = setup_test();
    let registry = invoice_token::Client::new(&ctx.env, &ctx.registry_id);
    let escrow = invoice_escrow::Client::new(&ctx.env, &ctx.escrow_id);
    let stablecoin = token::Client::new(&ctx.env, &ctx.stablecoin);

    let invoice_id = registry.tokenize(
        &ctx.issuer,
        &String::from_str(&ctx.env, "INV-2024-0003"),
        &80_000i128,
        &8_000i128,
        &(ctx.env.ledger().timestamp() + 30 * DAY),
        &ctx.debtor,
        &String::from_str(&ctx.env, "manufacturing"),
    );
    registry.verify(&ctx.verifier, &invoice_id);

    // Debtor deposits the full face value, then releases to the holder
    escrow.deposit_escrow(&ctx.debtor, &invoice_id, &80_000i128);
    escrow.release_escrow(&ctx.debtor, &invoice_id);

    // 1% escrow fee
    assert_eq!(stablecoin.balance(&ctx.issuer), 79_200);
    assert!(registry.get_invoice(&invoice_id).paid);

    let deposit = escrow.get_deposit(&invoice_id);
    assert!(deposit.released);
    assert!(!deposit.refunded);
}

#[test]
fn test_pool_finances_and_earns_yield() {
    let ctx = setup_test();
    let registry = invoice_token::Client::new(&ctx.env, &ctx.registry_id);
    let pool = liquidity_pool::Client::new(&ctx.env, &ctx.pool_id);
    let stablecoin = token::Client::new(&ctx.env, &ctx.stablecoin);

    let invoice_id = registry.tokenize(
        &ctx.issuer,
        &String::from_str(&ctx.env, "INV-2024-0004"),
        &50_000i128,
        &5_000i128,
        &(ctx.env.ledger().timestamp() + 60 * DAY),
        &ctx.debtor,
        &String::from_str(&ctx.env, "freight"),
    );
    registry.verify(&ctx.verifier, &invoice_id);

    pool.pool_deposit(&ctx.investor_a, &200_000i128);
    pool.add_strategy(
        &ctx.manager,
        &1u32,
        &650u32,
        &1_500i128,
        &(90 * DAY),
        &5_000i128,
    );

    pool.finance_invoice(&ctx.manager, &invoice_id, &45_000i128, &700u32, &(60 * DAY));
    assert_eq!(stablecoin.balance(&ctx.issuer), 45_000);

    // Debtor repays face value: 5,000 above principal accrues as yield
    pool.record_repayment(&invoice_id, &ctx.debtor, &50_000i128);
    assert_eq!(pool.total_assets(), 205_000);
    assert_eq!(pool.total_financed(), 0i128);
}
