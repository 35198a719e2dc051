#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::{Config, DataKey, EscrowDeposit, AUTO_RELEASE_GRACE, BASIS_POINTS};

use events::*;
use storage::Invoice;

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct InvoiceEscrow;

#[contractimpl]
impl InvoiceEscrow {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    pub fn initialize(
        env: Env,
        admin: Address,
        invoice_token: Address,
        stablecoin: Address,
        fee_recipient: Address,
        escrow_fee_bps: i128,
        escrow_timeout: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if escrow_fee_bps < 0 || escrow_fee_bps > BASIS_POINTS {
            return Err(Error::InvalidAmount);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                invoice_token,
                stablecoin,
                fee_recipient,
                escrow_fee_bps,
                escrow_timeout,
                version: 1,
            },
        );
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    pub fn update_config(
        env: Env,
        fee_recipient: Address,
        escrow_fee_bps: i128,
        escrow_timeout: u64,
    ) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if escrow_fee_bps < 0 || escrow_fee_bps > BASIS_POINTS {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                invoice_token: config.invoice_token,
                stablecoin: config.stablecoin,
                fee_recipient,
                escrow_fee_bps,
                escrow_timeout,
                version: config.version + 1,
            },
        );

        Ok(())
    }

    pub fn pause(env: Env) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    // ============================================
    // DEPOSIT
    // ============================================

    /// Deposit the full invoice value against one invoice
    ///
    /// # Errors
    /// - `DepositExists`: A live deposit already exists
    /// - `BelowFaceValue`: amount < invoice face value
    /// - `NotVerified` / `InvoicePaid`
    pub fn deposit_escrow(
        env: Env,
        payer: Address,
        invoice_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        payer.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;

        if let Some(existing) = Self::read_deposit(&env, invoice_id) {
            if !existing.released && !existing.refunded {
                return Err(Error::DepositExists);
            }
        }

        let invoice = Self::fetch_invoice(&env, &config, invoice_id);
        if !invoice.verified {
            return Err(Error::NotVerified);
        }
        if invoice.paid {
            return Err(Error::InvoicePaid);
        }
        if amount < invoice.face_value {
            return Err(Error::BelowFaceValue);
        }

        let deposit = EscrowDeposit {
            invoice_id,
            payer: payer.clone(),
            amount,
            deposited_at: env.ledger().timestamp(),
            released: false,
            refunded: false,
        };
        env.storage()
            .instance()
            .set(&DataKey::Deposit(invoice_id), &deposit);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&payer, &env.current_contract_address(), &amount);

        env.events().publish(
            (Symbol::new(&env, "escrow_deposit"), invoice_id),
            DepositEvent {
                invoice_id,
                payer,
                amount,
            },
        );

        Ok(())
    }

    // ============================================
    // RELEASE
    // ============================================

    /// Release to the current claim-holder; caller must be the debtor, the
    /// claim-holder or the admin
    pub fn release_escrow(env: Env, caller: Address, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        caller.require_auth();

        let config = Self::read_config(&env)?;
        let deposit = Self::read_live_deposit(&env, invoice_id)?;
        let invoice = Self::fetch_invoice(&env, &config, invoice_id);
        let holder = Self::fetch_majority_holder(&env, &config, invoice_id);

        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;

        if caller != invoice.debtor && caller != holder && caller != admin {
            return Err(Error::Unauthorized);
        }

        Self::apply_release(&env, &config, deposit, &holder, false)?;

        Self::release_guard(&env);
        Ok(())
    }

    /// Permissionless release once the invoice is 7 days past due or the
    /// escrow timeout has elapsed. Deliberately skips the authorized-party
    /// check so stuck counterparties cannot freeze funds.
    pub fn auto_release_escrow(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        let config = Self::read_config(&env)?;
        let deposit = Self::read_live_deposit(&env, invoice_id)?;
        let invoice = Self::fetch_invoice(&env, &config, invoice_id);

        let now = env.ledger().timestamp();
        let past_due = now > invoice.due_date + AUTO_RELEASE_GRACE;
        let timed_out = now > deposit.deposited_at + config.escrow_timeout;

        if !past_due && !timed_out {
            return Err(Error::TooEarly);
        }

        let holder = Self::fetch_majority_holder(&env, &config, invoice_id);
        Self::apply_release(&env, &config, deposit, &holder, true)?;

        Self::release_guard(&env);
        Ok(())
    }

    // ============================================
    // REFUND
    // ============================================

    /// Dispute-path refund; admin only
    pub fn refund_escrow(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        Self::require_admin(&env)?;

        let config = Self::read_config(&env)?;
        let deposit = Self::read_live_deposit(&env, invoice_id)?;

        Self::apply_refund(&env, &config, deposit, false)?;

        Self::release_guard(&env);
        Ok(())
    }

    /// Last-resort refund by the original payer alone, once twice the
    /// escrow timeout has elapsed with no release
    pub fn emergency_refund_escrow(
        env: Env,
        payer: Address,
        invoice_id: u64,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        payer.require_auth();

        let config = Self::read_config(&env)?;
        let deposit = Self::read_live_deposit(&env, invoice_id)?;

        if payer != deposit.payer {
            return Err(Error::NotPayer);
        }

        let now = env.ledger().timestamp();
        if now <= deposit.deposited_at + 2 * config.escrow_timeout {
            return Err(Error::TooEarly);
        }

        Self::apply_refund(&env, &config, deposit, true)?;

        Self::release_guard(&env);
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_deposit(env: Env, invoice_id: u64) -> Result<EscrowDeposit, Error> {
        Self::read_deposit(&env, invoice_id).ok_or(Error::DepositNotFound)
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        Self::read_config(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        let paused = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false);

        if paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn take_guard(env: &Env) -> Result<(), Error> {
        let held = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::ReentryGuard)
            .unwrap_or(false);

        if held {
            return Err(Error::Reentry);
        }
        env.storage().instance().set(&DataKey::ReentryGuard, &true);
        Ok(())
    }

    fn release_guard(env: &Env) {
        env.storage().instance().set(&DataKey::ReentryGuard, &false);
    }

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn read_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn read_deposit(env: &Env, invoice_id: u64) -> Option<EscrowDeposit> {
        env.storage().instance().get(&DataKey::Deposit(invoice_id))
    }

    /// Deposit that is neither released nor refunded; the terminal flags are
    /// checked here, before either side of the release/refund pair runs
    fn read_live_deposit(env: &Env, invoice_id: u64) -> Result<EscrowDeposit, Error> {
        let deposit = Self::read_deposit(env, invoice_id).ok_or(Error::DepositNotFound)?;
        if deposit.released {
            return Err(Error::AlreadyReleased);
        }
        if deposit.refunded {
            return Err(Error::AlreadyRefunded);
        }
        Ok(deposit)
    }

    fn apply_release(
        env: &Env,
        config: &Config,
        mut deposit: EscrowDeposit,
        holder: &Address,
        auto: bool,
    ) -> Result<(), Error> {
        let fee = deposit
            .amount
            .checked_mul(config.escrow_fee_bps)
            .and_then(|v| v.checked_div(BASIS_POINTS))
            .ok_or(Error::InvalidAmount)?;
        let payout = deposit.amount - fee;
        let invoice_id = deposit.invoice_id;

        // Flags flip before any funds move
        deposit.released = true;
        env.storage()
            .instance()
            .set(&DataKey::Deposit(invoice_id), &deposit);

        Self::mark_paid(env, config, invoice_id);

        let stablecoin = token::Client::new(env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), holder, &payout);
        if fee > 0 {
            stablecoin.transfer(&env.current_contract_address(), &config.fee_recipient, &fee);
        }

        env.events().publish(
            (Symbol::new(env, "escrow_released"), invoice_id),
            ReleasedEvent {
                invoice_id,
                holder: holder.clone(),
                amount: deposit.amount,
                fee,
                auto,
            },
        );

        Ok(())
    }

    fn apply_refund(
        env: &Env,
        config: &Config,
        mut deposit: EscrowDeposit,
        emergency: bool,
    ) -> Result<(), Error> {
        let invoice_id = deposit.invoice_id;

        deposit.refunded = true;
        env.storage()
            .instance()
            .set(&DataKey::Deposit(invoice_id), &deposit);

        let stablecoin = token::Client::new(env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &deposit.payer, &deposit.amount);

        env.events().publish(
            (Symbol::new(env, "escrow_refunded"), invoice_id),
            RefundedEvent {
                invoice_id,
                payer: deposit.payer,
                amount: deposit.amount,
                emergency,
            },
        );

        Ok(())
    }

    fn fetch_invoice(env: &Env, config: &Config, invoice_id: u64) -> Invoice {
        env.invoke_contract(
            &config.invoice_token,
            &Symbol::new(env, "get_invoice"),
            vec![env, invoice_id.into_val(env)],
        )
    }

    fn fetch_majority_holder(env: &Env, config: &Config, invoice_id: u64) -> Address {
        env.invoke_contract(
            &config.invoice_token,
            &Symbol::new(env, "majority_holder"),
            vec![env, invoice_id.into_val(env)],
        )
    }

    fn mark_paid(env: &Env, config: &Config, invoice_id: u64) {
        env.invoke_contract::<()>(
            &config.invoice_token,
            &Symbol::new(env, "mark_paid"),
            vec![
                env,
                env.current_contract_address().to_val(),
                invoice_id.into_val(env),
            ],
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use invoice_token::{InvoiceToken, InvoiceTokenClient, Role};
    use soroban_sdk::{
        testutils::{Address as _, Ledger},
        token::{StellarAssetClient, TokenClient},
        Address, Env, String,
    };

    const DAY: u64 = 86400;
    const TIMEOUT: u64 = 30 * DAY;

    struct Ctx {
        env: Env,
        escrow: InvoiceEscrowClient<'static>,
        registry: InvoiceTokenClient<'static>,
        stablecoin: TokenClient<'static>,
        admin: Address,
        fee_recipient: Address,
        issuer: Address,
        debtor: Address,
        payer: Address,
        invoice_id: u64,
    }

    fn setup() -> Ctx {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(1_000_000);

        let admin = Address::generate(&env);
        let fee_recipient = Address::generate(&env);
        let issuer = Address::generate(&env);
        let debtor = Address::generate(&env);
        let payer = Address::generate(&env);
        let verifier = Address::generate(&env);

        let registry_id = env.register_contract(None, InvoiceToken);
        let registry = InvoiceTokenClient::new(&env, &registry_id);
        registry.initialize(&admin, &fee_recipient, &0i128);
        registry.set_role(&verifier, &Role::Verifier, &true);

        let sac = env.register_stellar_asset_contract_v2(admin.clone());
        let stablecoin = TokenClient::new(&env, &sac.address());
        StellarAssetClient::new(&env, &sac.address()).mint(&payer, &1_000_000i128);

        let escrow_id = env.register_contract(None, InvoiceEscrow);
        let escrow = InvoiceEscrowClient::new(&env, &escrow_id);
        escrow.initialize(
            &admin,
            &registry_id,
            &sac.address(),
            &fee_recipient,
            &100i128, // 1%
            &TIMEOUT,
        );
        registry.add_operator(&escrow_id);

        let invoice_id = registry.tokenize(
            &issuer,
            &String::from_str(&env, "INV-200"),
            &100_000i128,
            &10_000i128,
            &(env.ledger().timestamp() + 60 * DAY),
            &debtor,
            &String::from_str(&env, "manufacturing"),
        );
        registry.verify(&verifier, &invoice_id);

        Ctx {
            env,
            escrow,
            registry,
            stablecoin,
            admin,
            fee_recipient,
            issuer,
            debtor,
            payer,
            invoice_id,
        }
    }

    #[test]
    fn test_deposit_requires_face_value() {
        let ctx = setup();

        let result = ctx
            .escrow
            .try_deposit_escrow(&ctx.payer, &ctx.invoice_id, &99_999i128);
        assert_eq!(result, Err(Ok(Error::BelowFaceValue)));

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        let deposit = ctx.escrow.get_deposit(&ctx.invoice_id);
        assert_eq!(deposit.amount, 100_000);
        assert!(!deposit.released);
        assert!(!deposit.refunded);

        // one live deposit per invoice
        let result = ctx
            .escrow
            .try_deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);
        assert_eq!(result, Err(Ok(Error::DepositExists)));
    }

    #[test]
    fn test_release_by_debtor_pays_holder_net_of_fee() {
        let ctx = setup();

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);
        ctx.escrow.release_escrow(&ctx.debtor, &ctx.invoice_id);

        // issuer still holds all shares, so issuer is the claim-holder
        assert_eq!(ctx.stablecoin.balance(&ctx.issuer), 99_000);
        assert_eq!(ctx.stablecoin.balance(&ctx.fee_recipient), 1_000);
        assert!(ctx.escrow.get_deposit(&ctx.invoice_id).released);
        assert!(ctx.registry.get_invoice(&ctx.invoice_id).paid);
    }

    #[test]
    fn test_release_rejects_strangers() {
        let ctx = setup();
        let stranger = Address::generate(&ctx.env);

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        let result = ctx.escrow.try_release_escrow(&stranger, &ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::Unauthorized)));

        // admin path works
        ctx.escrow.release_escrow(&ctx.admin, &ctx.invoice_id);
    }

    #[test]
    fn test_auto_release_time_gates() {
        let ctx = setup();

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        let result = ctx.escrow.try_auto_release_escrow(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::TooEarly)));

        // escrow timeout elapses before the due date here
        ctx.env.ledger().with_mut(|li| li.timestamp += TIMEOUT + 1);
        ctx.escrow.auto_release_escrow(&ctx.invoice_id);

        assert!(ctx.escrow.get_deposit(&ctx.invoice_id).released);
        assert_eq!(ctx.stablecoin.balance(&ctx.issuer), 99_000);
    }

    #[test]
    fn test_auto_release_after_due_date_grace() {
        let ctx = setup();

        // long timeout so the due-date path is the one that opens
        ctx.escrow
            .update_config(&ctx.fee_recipient, &100i128, &(365 * DAY));

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        // due date + 7 days
        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp += 60 * DAY + AUTO_RELEASE_GRACE + 1);
        ctx.escrow.auto_release_escrow(&ctx.invoice_id);
        assert!(ctx.escrow.get_deposit(&ctx.invoice_id).released);
    }

    #[test]
    fn test_refund_is_admin_only_and_terminal() {
        let ctx = setup();

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        let balance_before = ctx.stablecoin.balance(&ctx.payer);
        ctx.escrow.refund_escrow(&ctx.invoice_id);
        assert_eq!(ctx.stablecoin.balance(&ctx.payer), balance_before + 100_000);

        let deposit = ctx.escrow.get_deposit(&ctx.invoice_id);
        assert!(deposit.refunded);
        assert!(!deposit.released);

        // neither side can run again
        let result = ctx.escrow.try_release_escrow(&ctx.debtor, &ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadyRefunded)));
        let result = ctx.escrow.try_refund_escrow(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadyRefunded)));
    }

    #[test]
    fn test_release_then_refund_rejected() {
        let ctx = setup();

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);
        ctx.escrow.release_escrow(&ctx.debtor, &ctx.invoice_id);

        let result = ctx.escrow.try_refund_escrow(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadyReleased)));
    }

    #[test]
    fn test_emergency_refund_payer_only_after_double_timeout() {
        let ctx = setup();
        let stranger = Address::generate(&ctx.env);

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);

        let result = ctx
            .escrow
            .try_emergency_refund_escrow(&ctx.payer, &ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::TooEarly)));

        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp += 2 * TIMEOUT + 1);

        let result = ctx
            .escrow
            .try_emergency_refund_escrow(&stranger, &ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::NotPayer)));

        ctx.escrow
            .emergency_refund_escrow(&ctx.payer, &ctx.invoice_id);
        assert_eq!(ctx.stablecoin.balance(&ctx.payer), 1_000_000);
    }

    #[test]
    fn test_fresh_deposit_allowed_after_refund() {
        let ctx = setup();

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);
        ctx.escrow.refund_escrow(&ctx.invoice_id);

        ctx.escrow
            .deposit_escrow(&ctx.payer, &ctx.invoice_id, &100_000i128);
        let deposit = ctx.escrow.get_deposit(&ctx.invoice_id);
        assert!(!deposit.refunded);
        assert!(!deposit.released);
    }
}
