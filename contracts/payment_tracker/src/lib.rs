#![no_std]

mod distribution;
mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::{
    Config, DataKey, Distribution, InvestorShare, Payment, PaymentSchedule, Recovery,
    ScheduleStatus, BASIS_POINTS, DEFAULT_DELAY,
};

use distribution::{investor_payout, platform_fee};
use events::*;
use storage::Invoice;

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, String, Symbol, Vec};

#[contract]
pub struct PaymentTracker;

#[contractimpl]
impl PaymentTracker {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    pub fn initialize(
        env: Env,
        admin: Address,
        invoice_token: Address,
        stablecoin: Address,
        fee_recipient: Address,
        platform_fee_bps: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if platform_fee_bps < 0 || platform_fee_bps > BASIS_POINTS {
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
                platform_fee_bps,
                version: 1,
            },
        );
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    pub fn update_config(
        env: Env,
        fee_recipient: Address,
        platform_fee_bps: i128,
    ) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if platform_fee_bps < 0 || platform_fee_bps > BASIS_POINTS {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                invoice_token: config.invoice_token,
                stablecoin: config.stablecoin,
                fee_recipient,
                platform_fee_bps,
                version: config.version + 1,
            },
        );

        Ok(())
    }

    pub fn set_manager(env: Env, manager: Address, enabled: bool) -> Result<(), Error> {
        Self::require_admin(&env)?;

        let key = DataKey::Manager(manager);
        if enabled {
            env.storage().instance().set(&key, &true);
        } else {
            env.storage().instance().remove(&key);
        }

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
    // SCHEDULE CREATION
    // ============================================

    /// Create the one payment schedule for an invoice once its financing
    /// investors are known
    ///
    /// # Errors
    /// - `ScheduleExists`: One schedule per invoice
    /// - `InvalidShareSplit`: Investor bps must sum to exactly 10,000
    /// - `NotVerified`: Invoice not verified
    pub fn create_schedule(
        env: Env,
        caller: Address,
        invoice_id: u64,
        expected_amount: i128,
        due_date: u64,
        grace_period: u64,
        investors: Vec<InvestorShare>,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        caller.require_auth();
        Self::require_manager(&env, &caller)?;

        if expected_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        if env.storage().instance().has(&DataKey::Schedule(invoice_id)) {
            return Err(Error::ScheduleExists);
        }

        if investors.is_empty() {
            return Err(Error::NoInvestors);
        }

        let mut bps_total: u32 = 0;
        for share in investors.iter() {
            bps_total += share.share_bps;
        }
        if bps_total as i128 != BASIS_POINTS {
            return Err(Error::InvalidShareSplit);
        }

        let config = Self::read_config(&env)?;
        let invoice = Self::fetch_invoice(&env, &config, invoice_id);
        if !invoice.verified {
            return Err(Error::NotVerified);
        }

        let schedule = PaymentSchedule {
            invoice_id,
            expected_amount,
            due_date,
            grace_period,
            debtor: invoice.debtor,
            total_paid: 0,
            status: ScheduleStatus::Scheduled,
            settled: false,
            created_at: env.ledger().timestamp(),
        };

        env.storage()
            .instance()
            .set(&DataKey::Schedule(invoice_id), &schedule);
        env.storage()
            .instance()
            .set(&DataKey::Investors(invoice_id), &investors);
        env.storage()
            .instance()
            .set(&DataKey::PaymentCount(invoice_id), &0u32);

        env.events().publish(
            (Symbol::new(&env, "schedule_created"), invoice_id),
            ScheduleCreatedEvent {
                invoice_id,
                expected_amount,
                due_date,
                grace_period,
                investor_count: investors.len(),
            },
        );

        Ok(())
    }

    // ============================================
    // PAYMENTS
    // ============================================

    /// Record one received payment, advance status, and settle+distribute in
    /// the same step once the expected amount is covered
    ///
    /// # Errors
    /// - `AlreadySettled`: Schedule is terminal
    /// - `InvalidStatus`: Defaulted schedules take the recovery path
    pub fn record_payment(
        env: Env,
        invoice_id: u64,
        payer: Address,
        amount: i128,
        method: Symbol,
        reference: String,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        payer.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        let mut schedule = Self::read_schedule(&env, invoice_id)?;

        if schedule.settled {
            return Err(Error::AlreadySettled);
        }
        if schedule.status == ScheduleStatus::Defaulted {
            return Err(Error::InvalidStatus);
        }

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&payer, &env.current_contract_address(), &amount);

        let index: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PaymentCount(invoice_id))
            .unwrap_or(0);
        let payment = Payment {
            amount,
            payer: payer.clone(),
            method: method.clone(),
            reference,
            received_at: env.ledger().timestamp(),
        };
        env.storage()
            .instance()
            .set(&DataKey::Payment(invoice_id, index), &payment);
        env.storage()
            .instance()
            .set(&DataKey::PaymentCount(invoice_id), &(index + 1));

        schedule.total_paid = schedule
            .total_paid
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        env.events().publish(
            (Symbol::new(&env, "payment_received"), invoice_id),
            PaymentReceivedEvent {
                invoice_id,
                payer,
                amount,
                method,
                total_paid: schedule.total_paid,
            },
        );

        Self::apply_status(&env, &mut schedule);

        if schedule.total_paid >= schedule.expected_amount {
            Self::settle_and_distribute(&env, &config, schedule)?;
        } else {
            env.storage()
                .instance()
                .set(&DataKey::Schedule(invoice_id), &schedule);
        }

        Self::release_guard(&env);
        Ok(())
    }

    /// Re-evaluate the time-based status on demand; settled schedules are
    /// left untouched
    pub fn update_status(env: Env, invoice_id: u64) -> Result<ScheduleStatus, Error> {
        let mut schedule = Self::read_schedule(&env, invoice_id)?;

        if schedule.settled {
            return Ok(schedule.status);
        }

        if Self::apply_status(&env, &mut schedule) {
            env.storage()
                .instance()
                .set(&DataKey::Schedule(invoice_id), &schedule);
        }

        Ok(schedule.status)
    }

    /// Declare a schedule defaulted once 30 days past due + grace have
    /// elapsed without full payment
    ///
    /// # Errors
    /// - `TooEarly`: Default window not open
    /// - `AlreadyDefaulted` / `AlreadySettled` / `NotFullyPaid` misuse guards
    pub fn handle_default(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        let mut schedule = Self::read_schedule(&env, invoice_id)?;

        if schedule.settled {
            return Err(Error::AlreadySettled);
        }
        if schedule.status == ScheduleStatus::Defaulted {
            return Err(Error::AlreadyDefaulted);
        }
        // A complete payment always wins over lateness
        if schedule.total_paid >= schedule.expected_amount {
            return Err(Error::InvalidStatus);
        }

        let now = env.ledger().timestamp();
        if now <= schedule.due_date + schedule.grace_period + DEFAULT_DELAY {
            return Err(Error::TooEarly);
        }

        let old_status = schedule.status.clone();
        schedule.status = ScheduleStatus::Defaulted;
        env.storage()
            .instance()
            .set(&DataKey::Schedule(invoice_id), &schedule);

        env.events().publish(
            (Symbol::new(&env, "status_updated"), invoice_id),
            StatusUpdatedEvent {
                invoice_id,
                old_status,
                new_status: ScheduleStatus::Defaulted,
            },
        );
        env.events().publish(
            (Symbol::new(&env, "defaulted"), invoice_id),
            DefaultedEvent {
                invoice_id,
                unpaid_amount: schedule.expected_amount - schedule.total_paid,
            },
        );

        Ok(())
    }

    /// Record recovered funds on a defaulted schedule; settles immediately
    pub fn record_recovery(
        env: Env,
        caller: Address,
        invoice_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        caller.require_auth();
        Self::require_manager(&env, &caller)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        let mut schedule = Self::read_schedule(&env, invoice_id)?;

        if schedule.settled {
            return Err(Error::AlreadySettled);
        }
        if schedule.status != ScheduleStatus::Defaulted {
            return Err(Error::InvalidStatus);
        }

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&caller, &env.current_contract_address(), &amount);

        let index: u32 = env
            .storage()
            .instance()
            .get(&DataKey::RecoveryCount(invoice_id))
            .unwrap_or(0);
        let recovery = Recovery {
            amount,
            recorded_by: caller.clone(),
            recorded_at: env.ledger().timestamp(),
        };
        env.storage()
            .instance()
            .set(&DataKey::Recovery(invoice_id, index), &recovery);
        env.storage()
            .instance()
            .set(&DataKey::RecoveryCount(invoice_id), &(index + 1));

        schedule.total_paid = schedule
            .total_paid
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        schedule.status = ScheduleStatus::Recovered;

        env.events().publish(
            (Symbol::new(&env, "recovery"), invoice_id),
            RecoveryEvent {
                invoice_id,
                amount,
                recorded_by: caller,
            },
        );

        Self::settle_and_distribute(&env, &config, schedule)?;

        Self::release_guard(&env);
        Ok(())
    }

    // ============================================
    // SETTLEMENT & DISTRIBUTION
    // ============================================

    /// Settle a fully-paid schedule that has not yet distributed
    ///
    /// # Errors
    /// - `AlreadySettled`: Loud, never a silent second distribution
    /// - `NotFullyPaid`: total_paid below expected_amount
    pub fn auto_settle(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        let config = Self::read_config(&env)?;
        let mut schedule = Self::read_schedule(&env, invoice_id)?;

        if schedule.settled {
            return Err(Error::AlreadySettled);
        }
        if schedule.total_paid < schedule.expected_amount {
            return Err(Error::NotFullyPaid);
        }

        Self::apply_status(&env, &mut schedule);
        Self::settle_and_distribute(&env, &config, schedule)?;

        Self::release_guard(&env);
        Ok(())
    }

    /// Public distribution trigger; same idempotence gate as auto_settle
    pub fn distribute_returns(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::auto_settle(env, invoice_id)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_schedule(env: Env, invoice_id: u64) -> Result<PaymentSchedule, Error> {
        Self::read_schedule(&env, invoice_id)
    }

    pub fn get_investors(env: Env, invoice_id: u64) -> Result<Vec<InvestorShare>, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Investors(invoice_id))
            .ok_or(Error::ScheduleNotFound)
    }

    pub fn get_payment(env: Env, invoice_id: u64, index: u32) -> Result<Payment, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Payment(invoice_id, index))
            .ok_or(Error::ScheduleNotFound)
    }

    pub fn payment_count(env: Env, invoice_id: u64) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::PaymentCount(invoice_id))
            .unwrap_or(0)
    }

    pub fn get_recovery(env: Env, invoice_id: u64, index: u32) -> Result<Recovery, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Recovery(invoice_id, index))
            .ok_or(Error::ScheduleNotFound)
    }

    pub fn recovery_count(env: Env, invoice_id: u64) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::RecoveryCount(invoice_id))
            .unwrap_or(0)
    }

    pub fn get_distribution(env: Env, invoice_id: u64, index: u32) -> Result<Distribution, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Distribution(invoice_id, index))
            .ok_or(Error::ScheduleNotFound)
    }

    pub fn distribution_count(env: Env, invoice_id: u64) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::DistributionCount(invoice_id))
            .unwrap_or(0)
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

    fn require_manager(env: &Env, caller: &Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;

        if *caller == admin {
            return Ok(());
        }

        let is_manager = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Manager(caller.clone()))
            .unwrap_or(false);

        if !is_manager {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn read_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn read_schedule(env: &Env, invoice_id: u64) -> Result<PaymentSchedule, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Schedule(invoice_id))
            .ok_or(Error::ScheduleNotFound)
    }

    /// Ordered transition rule. A complete payment always wins; the
    /// time-based states only apply while money is still owed. Defaulted
    /// and Recovered only move through their explicit entry points.
    fn evaluate_status(schedule: &PaymentSchedule, now: u64) -> ScheduleStatus {
        match schedule.status {
            ScheduleStatus::Defaulted | ScheduleStatus::Recovered => {
                return schedule.status.clone()
            }
            _ => {}
        }

        if schedule.total_paid >= schedule.expected_amount {
            return ScheduleStatus::Paid;
        }

        if now > schedule.due_date {
            if now <= schedule.due_date + schedule.grace_period {
                return ScheduleStatus::InGracePeriod;
            }
            return ScheduleStatus::Overdue;
        }

        if schedule.total_paid > 0 {
            return ScheduleStatus::PartiallyPaid;
        }

        ScheduleStatus::Scheduled
    }

    /// Apply the transition rule in place; returns true and emits an event
    /// when the status changed
    fn apply_status(env: &Env, schedule: &mut PaymentSchedule) -> bool {
        let new_status = Self::evaluate_status(schedule, env.ledger().timestamp());
        if new_status == schedule.status {
            return false;
        }

        let old_status = schedule.status.clone();
        schedule.status = new_status.clone();

        env.events().publish(
            (Symbol::new(env, "status_updated"), schedule.invoice_id),
            StatusUpdatedEvent {
                invoice_id: schedule.invoice_id,
                old_status,
                new_status,
            },
        );

        true
    }

    /// Mark settlement and pay out in one step, so no "settled but
    /// undistributed" state is ever observable.
    ///
    /// The fee moves once, before the investor loop, and is skipped if the
    /// balance cannot cover it at that instant. Each investor payout is
    /// attempted independently; a shortfall writes an unsuccessful
    /// Distribution record (the amount remains owed) and the loop continues.
    fn settle_and_distribute(
        env: &Env,
        config: &Config,
        mut schedule: PaymentSchedule,
    ) -> Result<(), Error> {
        let invoice_id = schedule.invoice_id;

        schedule.settled = true;
        env.storage()
            .instance()
            .set(&DataKey::Schedule(invoice_id), &schedule);

        Self::mark_invoice_settled(env, config, invoice_id);

        let investors: Vec<InvestorShare> = env
            .storage()
            .instance()
            .get(&DataKey::Investors(invoice_id))
            .ok_or(Error::ScheduleNotFound)?;

        let fee =
            platform_fee(schedule.total_paid, config.platform_fee_bps).ok_or(Error::InvalidAmount)?;
        let distributable = schedule.total_paid - fee;

        let stablecoin = token::Client::new(env, &config.stablecoin);
        let this = env.current_contract_address();

        if fee > 0 && stablecoin.balance(&this) >= fee {
            stablecoin.transfer(&this, &config.fee_recipient, &fee);
        }

        let mut index: u32 = env
            .storage()
            .instance()
            .get(&DataKey::DistributionCount(invoice_id))
            .unwrap_or(0);
        let now = env.ledger().timestamp();

        for share in investors.iter() {
            let payout = investor_payout(distributable, share.share_bps)
                .ok_or(Error::InvalidAmount)?;

            let success = payout == 0 || stablecoin.balance(&this) >= payout;
            if success && payout > 0 {
                stablecoin.transfer(&this, &share.investor, &payout);
            }

            env.storage().instance().set(
                &DataKey::Distribution(invoice_id, index),
                &Distribution {
                    investor: share.investor.clone(),
                    amount: payout,
                    success,
                    distributed_at: now,
                },
            );
            index += 1;

            env.events().publish(
                (Symbol::new(env, "distributed"), invoice_id),
                DistributedEvent {
                    invoice_id,
                    investor: share.investor.clone(),
                    amount: payout,
                    success,
                },
            );
        }

        env.storage()
            .instance()
            .set(&DataKey::DistributionCount(invoice_id), &index);

        env.events().publish(
            (Symbol::new(env, "settled"), invoice_id),
            SettledEvent {
                invoice_id,
                total_paid: schedule.total_paid,
                fee,
                distributable,
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

    fn mark_invoice_settled(env: &Env, config: &Config, invoice_id: u64) {
        env.invoke_contract::<()>(
            &config.invoice_token,
            &Symbol::new(env, "mark_settled"),
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
        vec as svec, Address, Env, String, Symbol,
    };

    const DAY: u64 = 86400;

    struct Ctx {
        env: Env,
        tracker: PaymentTrackerClient<'static>,
        tracker_id: Address,
        registry: InvoiceTokenClient<'static>,
        stablecoin: TokenClient<'static>,
        fee_recipient: Address,
        manager: Address,
        debtor: Address,
        investor_a: Address,
        investor_b: Address,
        invoice_id: u64,
        due_date: u64,
    }

    fn setup() -> Ctx {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(1_000_000);

        let admin = Address::generate(&env);
        let fee_recipient = Address::generate(&env);
        let manager = Address::generate(&env);
        let issuer = Address::generate(&env);
        let debtor = Address::generate(&env);
        let verifier = Address::generate(&env);
        let investor_a = Address::generate(&env);
        let investor_b = Address::generate(&env);

        let registry_id = env.register_contract(None, InvoiceToken);
        let registry = InvoiceTokenClient::new(&env, &registry_id);
        registry.initialize(&admin, &fee_recipient, &0i128);
        registry.set_role(&verifier, &Role::Verifier, &true);

        let sac = env.register_stellar_asset_contract_v2(admin.clone());
        let stablecoin = TokenClient::new(&env, &sac.address());
        StellarAssetClient::new(&env, &sac.address()).mint(&debtor, &1_000_000i128);
        StellarAssetClient::new(&env, &sac.address()).mint(&manager, &1_000_000i128);

        let tracker_id = env.register_contract(None, PaymentTracker);
        let tracker = PaymentTrackerClient::new(&env, &tracker_id);
        tracker.initialize(
            &admin,
            &registry_id,
            &sac.address(),
            &fee_recipient,
            &100i128, // 1%
        );
        tracker.set_manager(&manager, &true);
        registry.add_operator(&tracker_id);

        let due_date = env.ledger().timestamp() + 10 * DAY;
        let invoice_id = registry.tokenize(
            &issuer,
            &String::from_str(&env, "INV-300"),
            &100_000i128,
            &10_000i128,
            &due_date,
            &debtor,
            &String::from_str(&env, "wholesale"),
        );
        registry.verify(&verifier, &invoice_id);

        let investors = svec![
            &env,
            InvestorShare {
                investor: investor_a.clone(),
                share_bps: 6_000,
            },
            InvestorShare {
                investor: investor_b.clone(),
                share_bps: 4_000,
            },
        ];
        tracker.create_schedule(
            &manager,
            &invoice_id,
            &100_000i128,
            &due_date,
            &(5 * DAY),
            &investors,
        );

        Ctx {
            env,
            tracker,
            tracker_id,
            registry,
            stablecoin,
            fee_recipient,
            manager,
            debtor,
            investor_a,
            investor_b,
            invoice_id,
            due_date,
        }
    }

    fn pay(ctx: &Ctx, amount: i128) {
        ctx.tracker.record_payment(
            &ctx.invoice_id,
            &ctx.debtor,
            &amount,
            &Symbol::new(&ctx.env, "bank"),
            &String::from_str(&ctx.env, "wire-1"),
        );
    }

    #[test]
    fn test_create_schedule_validations() {
        let ctx = setup();
        let stranger = Address::generate(&ctx.env);

        // one per invoice
        let investors = svec![
            &ctx.env,
            InvestorShare {
                investor: ctx.investor_a.clone(),
                share_bps: 10_000,
            },
        ];
        let result = ctx.tracker.try_create_schedule(
            &ctx.manager,
            &ctx.invoice_id,
            &100_000i128,
            &ctx.due_date,
            &(5 * DAY),
            &investors,
        );
        assert_eq!(result, Err(Ok(Error::ScheduleExists)));

        // manager gating
        let result = ctx.tracker.try_create_schedule(
            &stranger,
            &99u64,
            &100_000i128,
            &ctx.due_date,
            &(5 * DAY),
            &investors,
        );
        assert_eq!(result, Err(Ok(Error::Unauthorized)));

        // bps must sum to 10,000
        let bad_split = svec![
            &ctx.env,
            InvestorShare {
                investor: ctx.investor_a.clone(),
                share_bps: 6_000,
            },
            InvestorShare {
                investor: ctx.investor_b.clone(),
                share_bps: 3_999,
            },
        ];
        let result = ctx.tracker.try_create_schedule(
            &ctx.manager,
            &99u64,
            &100_000i128,
            &ctx.due_date,
            &(5 * DAY),
            &bad_split,
        );
        assert_eq!(result, Err(Ok(Error::InvalidShareSplit)));
    }

    #[test]
    fn test_partial_payment_sets_partially_paid() {
        let ctx = setup();

        pay(&ctx, 40_000);

        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert_eq!(schedule.total_paid, 40_000);
        assert_eq!(schedule.status, ScheduleStatus::PartiallyPaid);
        assert!(!schedule.settled);
        assert_eq!(ctx.tracker.payment_count(&ctx.invoice_id), 1);
    }

    #[test]
    fn test_full_payment_settles_and_distributes() {
        let ctx = setup();

        pay(&ctx, 100_000);

        // fee 1,000; distributable 99,000; 6000/4000 bps
        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert_eq!(schedule.status, ScheduleStatus::Paid);
        assert!(schedule.settled);

        assert_eq!(ctx.stablecoin.balance(&ctx.investor_a), 59_400);
        assert_eq!(ctx.stablecoin.balance(&ctx.investor_b), 39_600);
        assert_eq!(ctx.stablecoin.balance(&ctx.fee_recipient), 1_000);

        assert_eq!(ctx.tracker.distribution_count(&ctx.invoice_id), 2);
        assert!(ctx.tracker.get_distribution(&ctx.invoice_id, &0).success);
        assert!(ctx.tracker.get_distribution(&ctx.invoice_id, &1).success);

        let invoice = ctx.registry.get_invoice(&ctx.invoice_id);
        assert!(invoice.paid);
        assert!(invoice.settled);
    }

    #[test]
    fn test_distribution_never_runs_twice() {
        let ctx = setup();

        pay(&ctx, 100_000);

        let result = ctx.tracker.try_auto_settle(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadySettled)));
        let result = ctx.tracker.try_distribute_returns(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadySettled)));

        // and no further payments are accepted
        let result = ctx.tracker.try_record_payment(
            &ctx.invoice_id,
            &ctx.debtor,
            &1_000i128,
            &Symbol::new(&ctx.env, "bank"),
            &String::from_str(&ctx.env, "wire-2"),
        );
        assert_eq!(result, Err(Ok(Error::AlreadySettled)));
    }

    #[test]
    fn test_grace_overdue_default_windows() {
        let ctx = setup();

        // T+3d into a 5d grace period
        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp = 1_000_000 + 13 * DAY);
        assert_eq!(
            ctx.tracker.update_status(&ctx.invoice_id),
            ScheduleStatus::InGracePeriod
        );

        // T+6d: grace elapsed
        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp = 1_000_000 + 16 * DAY);
        assert_eq!(
            ctx.tracker.update_status(&ctx.invoice_id),
            ScheduleStatus::Overdue
        );

        // default window opens 30d past due + grace
        let result = ctx.tracker.try_handle_default(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::TooEarly)));

        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp = 1_000_000 + 46 * DAY + 1);
        ctx.tracker.handle_default(&ctx.invoice_id);

        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert_eq!(schedule.status, ScheduleStatus::Defaulted);

        let result = ctx.tracker.try_handle_default(&ctx.invoice_id);
        assert_eq!(result, Err(Ok(Error::AlreadyDefaulted)));
    }

    #[test]
    fn test_late_full_payment_beats_overdue() {
        let ctx = setup();

        // way past due, but the debtor pays everything
        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp = 1_000_000 + 20 * DAY);
        pay(&ctx, 100_000);

        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert_eq!(schedule.status, ScheduleStatus::Paid);
        assert!(schedule.settled);
    }

    #[test]
    fn test_defaulted_blocks_payments_takes_recovery() {
        let ctx = setup();

        pay(&ctx, 30_000);

        ctx.env
            .ledger()
            .with_mut(|li| li.timestamp = 1_000_000 + 46 * DAY + 1);
        ctx.tracker.handle_default(&ctx.invoice_id);

        let result = ctx.tracker.try_record_payment(
            &ctx.invoice_id,
            &ctx.debtor,
            &10_000i128,
            &Symbol::new(&ctx.env, "bank"),
            &String::from_str(&ctx.env, "wire-3"),
        );
        assert_eq!(result, Err(Ok(Error::InvalidStatus)));

        // recovery settles immediately with whatever was collected
        ctx.tracker
            .record_recovery(&ctx.manager, &ctx.invoice_id, &20_000i128);

        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert_eq!(schedule.status, ScheduleStatus::Recovered);
        assert!(schedule.settled);
        assert_eq!(schedule.total_paid, 50_000);
        assert_eq!(ctx.tracker.recovery_count(&ctx.invoice_id), 1);

        // 50,000 collected: fee 500, distributable 49,500 at 6000/4000
        assert_eq!(ctx.stablecoin.balance(&ctx.investor_a), 29_700);
        assert_eq!(ctx.stablecoin.balance(&ctx.investor_b), 19_800);
    }

    #[test]
    fn test_recovery_requires_defaulted() {
        let ctx = setup();

        let result = ctx
            .tracker
            .try_record_recovery(&ctx.manager, &ctx.invoice_id, &10_000i128);
        assert_eq!(result, Err(Ok(Error::InvalidStatus)));
    }

    #[test]
    fn test_shortfall_marks_distribution_unsuccessful() {
        let ctx = setup();
        let drain = Address::generate(&ctx.env);

        pay(&ctx, 50_000);

        // simulate an external drain of the tracker's balance
        ctx.stablecoin.transfer(&ctx.tracker_id, &drain, &30_000i128);

        pay(&ctx, 50_000);

        // balance at settlement: 70,000. fee 1,000 -> 69,000 left.
        // investor_a gets 59,400 (9,600 left); investor_b's 39,600 cannot
        // be covered and stays owed.
        assert_eq!(ctx.stablecoin.balance(&ctx.investor_a), 59_400);
        assert_eq!(ctx.stablecoin.balance(&ctx.investor_b), 0);

        let first = ctx.tracker.get_distribution(&ctx.invoice_id, &0);
        assert!(first.success);
        let second = ctx.tracker.get_distribution(&ctx.invoice_id, &1);
        assert!(!second.success);
        assert_eq!(second.amount, 39_600);

        let schedule = ctx.tracker.get_schedule(&ctx.invoice_id);
        assert!(schedule.settled);
    }
}
