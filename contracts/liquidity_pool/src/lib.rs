#![no_std]

mod error;
mod events;
mod storage;
mod yield_calc;

pub use error::Error;
pub use storage::{
    Accounting, Config, DataKey, Financing, PoolParams, PoolPosition, Strategy, BASIS_POINTS,
    SECONDS_PER_YEAR,
};

use events::*;
use storage::Invoice;
use yield_calc::{
    accrued_over, apy_for_utilization, assets_for_shares, shares_for_deposit, user_share_bps,
    utilization_bps,
};

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct LiquidityPool;

#[contractimpl]
impl LiquidityPool {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    pub fn initialize(
        env: Env,
        admin: Address,
        invoice_token: Address,
        stablecoin: Address,
        fee_recipient: Address,
        params: PoolParams,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        Self::check_params(&params)?;

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                invoice_token,
                stablecoin,
                fee_recipient,
                params,
                version: 1,
            },
        );
        env.storage().instance().set(&DataKey::Paused, &false);
        env.storage().instance().set(&DataKey::TotalAssets, &0i128);
        env.storage().instance().set(&DataKey::TotalSupply, &0i128);
        env.storage().instance().set(&DataKey::TotalFinanced, &0i128);
        env.storage().instance().set(&DataKey::StrategyCount, &0u32);
        env.storage()
            .instance()
            .set(&DataKey::PoolApyBps, &apy_for_utilization(0));

        Ok(())
    }

    pub fn update_config(
        env: Env,
        fee_recipient: Address,
        params: PoolParams,
    ) -> Result<(), Error> {
        Self::require_admin(&env)?;
        Self::check_params(&params)?;

        let config = Self::read_config(&env)?;
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                invoice_token: config.invoice_token,
                stablecoin: config.stablecoin,
                fee_recipient,
                params,
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
    // DEPOSITS & WITHDRAWALS
    // ============================================

    /// Convert a stablecoin deposit to pool shares at the current ratio
    ///
    /// # Errors
    /// - `BelowMinDeposit` / `AboveMaxDeposit` / `PoolCapExceeded`
    pub fn pool_deposit(env: Env, investor: Address, amount: i128) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        investor.require_auth();

        let config = Self::read_config(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if amount < config.params.min_deposit {
            return Err(Error::BelowMinDeposit);
        }
        if amount > config.params.max_deposit {
            return Err(Error::AboveMaxDeposit);
        }

        let fee = Self::bps_of(amount, config.params.deposit_fee_bps)?;
        let net = amount - fee;

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_supply = Self::read_i128(&env, &DataKey::TotalSupply);

        let new_assets = total_assets.checked_add(net).ok_or(Error::InvalidAmount)?;
        if new_assets > config.params.pool_cap {
            return Err(Error::PoolCapExceeded);
        }

        let shares =
            shares_for_deposit(net, total_assets, total_supply).ok_or(Error::InvalidAmount)?;
        if shares <= 0 {
            return Err(Error::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        let mut position = Self::read_position(&env, &investor).unwrap_or(PoolPosition {
            shares: 0,
            accrued_reward: 0,
            last_claim: now,
            deposited_at: now,
        });

        // Fold pending rewards before the share count changes, so the
        // accrual formula never applies a new ratio to an old interval
        Self::fold_rewards(&env, &mut position, total_assets, total_supply);

        position.shares = position
            .shares
            .checked_add(shares)
            .ok_or(Error::InvalidAmount)?;
        position.deposited_at = now;

        env.storage()
            .instance()
            .set(&DataKey::Position(investor.clone()), &position);
        env.storage().instance().set(&DataKey::TotalAssets, &new_assets);
        env.storage().instance().set(
            &DataKey::TotalSupply,
            &(total_supply
                .checked_add(shares)
                .ok_or(Error::InvalidAmount)?),
        );

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&investor, &env.current_contract_address(), &amount);
        if fee > 0 {
            stablecoin.transfer(&env.current_contract_address(), &config.fee_recipient, &fee);
        }

        Self::recompute_apy(&env);

        env.events().publish(
            (Symbol::new(&env, "pool_deposit"), investor.clone()),
            PoolDepositEvent {
                investor,
                amount,
                fee,
                shares_minted: shares,
            },
        );

        Self::release_guard(&env);
        Ok(shares)
    }

    /// Burn pool shares for their asset value, net of the withdrawal fee and
    /// the early-withdrawal penalty while the position is inside its lock
    pub fn pool_withdraw(env: Env, investor: Address, shares: i128) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        investor.require_auth();

        if shares <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        let mut position = Self::read_position(&env, &investor).ok_or(Error::PositionNotFound)?;

        if position.shares < shares {
            return Err(Error::InsufficientShares);
        }

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_supply = Self::read_i128(&env, &DataKey::TotalSupply);
        let total_financed = Self::read_i128(&env, &DataKey::TotalFinanced);

        let assets =
            assets_for_shares(shares, total_assets, total_supply).ok_or(Error::InvalidAmount)?;

        // Only un-lent cash can leave the pool
        if total_assets - total_financed < assets {
            return Err(Error::InsufficientLiquidity);
        }

        Self::fold_rewards(&env, &mut position, total_assets, total_supply);

        let now = env.ledger().timestamp();
        let fee = Self::bps_of(assets, config.params.withdrawal_fee_bps)?;
        let penalty = if now < position.deposited_at + config.params.min_lock_period {
            Self::bps_of(assets, config.params.early_penalty_bps)?
        } else {
            0
        };
        let net = assets - fee - penalty;

        position.shares -= shares;
        env.storage()
            .instance()
            .set(&DataKey::Position(investor.clone()), &position);
        env.storage()
            .instance()
            .set(&DataKey::TotalAssets, &(total_assets - assets));
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(total_supply - shares));

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &investor, &net);
        if fee + penalty > 0 {
            stablecoin.transfer(
                &env.current_contract_address(),
                &config.fee_recipient,
                &(fee + penalty),
            );
        }

        Self::recompute_apy(&env);

        env.events().publish(
            (Symbol::new(&env, "pool_withdrawal"), investor.clone()),
            PoolWithdrawalEvent {
                investor,
                shares_burned: shares,
                assets,
                fee,
                penalty,
            },
        );

        Self::release_guard(&env);
        Ok(net)
    }

    /// Pay out accrued rewards net of the performance fee and reset the
    /// accrual clock
    pub fn claim_rewards(env: Env, investor: Address) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        investor.require_auth();

        let config = Self::read_config(&env)?;
        let mut position = Self::read_position(&env, &investor).ok_or(Error::PositionNotFound)?;

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_supply = Self::read_i128(&env, &DataKey::TotalSupply);
        let total_financed = Self::read_i128(&env, &DataKey::TotalFinanced);

        Self::fold_rewards(&env, &mut position, total_assets, total_supply);

        let gross = position.accrued_reward;
        if gross <= 0 {
            return Err(Error::NothingToClaim);
        }

        // Rewards leave the pool as cash
        if total_assets - total_financed < gross {
            return Err(Error::InsufficientLiquidity);
        }

        let fee = Self::bps_of(gross, config.params.performance_fee_bps)?;
        let net = gross - fee;

        position.accrued_reward = 0;
        env.storage()
            .instance()
            .set(&DataKey::Position(investor.clone()), &position);
        env.storage()
            .instance()
            .set(&DataKey::TotalAssets, &(total_assets - gross));

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &investor, &net);
        if fee > 0 {
            stablecoin.transfer(&env.current_contract_address(), &config.fee_recipient, &fee);
        }

        Self::recompute_apy(&env);

        env.events().publish(
            (Symbol::new(&env, "rewards_claimed"), investor.clone()),
            RewardsClaimedEvent {
                investor,
                gross,
                fee,
                net,
            },
        );

        Self::release_guard(&env);
        Ok(net)
    }

    // ============================================
    // STRATEGIES & FINANCING
    // ============================================

    pub fn add_strategy(
        env: Env,
        caller: Address,
        risk_level: u32,
        min_credit_score: u32,
        max_interest_rate_bps: i128,
        max_duration: u64,
        target_allocation_bps: i128,
    ) -> Result<u32, Error> {
        Self::check_not_paused(&env)?;

        caller.require_auth();
        Self::require_manager(&env, &caller)?;

        if max_duration == 0
            || target_allocation_bps <= 0
            || target_allocation_bps > BASIS_POINTS
            || max_interest_rate_bps < 0
        {
            return Err(Error::InvalidAmount);
        }

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::StrategyCount)
            .unwrap_or(0);
        let strategy_id = count + 1;

        let strategy = Strategy {
            id: strategy_id,
            risk_level,
            min_credit_score,
            max_interest_rate_bps,
            max_duration,
            target_allocation_bps,
            active: true,
        };

        env.storage()
            .instance()
            .set(&DataKey::Strategy(strategy_id), &strategy);
        env.storage()
            .instance()
            .set(&DataKey::StrategyCount, &strategy_id);

        env.events().publish(
            (Symbol::new(&env, "strategy_added"), strategy_id),
            StrategyAddedEvent {
                strategy_id,
                risk_level,
                min_credit_score,
                max_duration,
            },
        );

        Ok(strategy_id)
    }

    pub fn set_strategy_active(
        env: Env,
        caller: Address,
        strategy_id: u32,
        active: bool,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        caller.require_auth();
        Self::require_manager(&env, &caller)?;

        let mut strategy: Strategy = env
            .storage()
            .instance()
            .get(&DataKey::Strategy(strategy_id))
            .ok_or(Error::StrategyNotFound)?;

        strategy.active = active;
        env.storage()
            .instance()
            .set(&DataKey::Strategy(strategy_id), &strategy);

        Ok(())
    }

    /// Advance pool capital to an invoice's issuer through the best-matching
    /// active strategy
    ///
    /// Best match = the compatible strategy with the highest credit-score
    /// floor, i.e. the most conservative capital that accepts the risk.
    ///
    /// # Errors
    /// - `NoMatchingStrategy`: Financing fails rather than defaulting to an
    ///   unsuitable strategy
    /// - `InsufficientLiquidity`: Advance exceeds un-lent cash
    pub fn finance_invoice(
        env: Env,
        caller: Address,
        invoice_id: u64,
        amount: i128,
        credit_score: u32,
        duration: u64,
    ) -> Result<u32, Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        caller.require_auth();
        Self::require_manager(&env, &caller)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        if env.storage().instance().has(&DataKey::Financing(invoice_id)) {
            return Err(Error::FinancingExists);
        }

        let config = Self::read_config(&env)?;
        let invoice = Self::fetch_invoice(&env, &config, invoice_id);
        if !invoice.verified || invoice.paid {
            return Err(Error::NotFinanceable);
        }

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_financed = Self::read_i128(&env, &DataKey::TotalFinanced);

        if total_assets - total_financed < amount {
            return Err(Error::InsufficientLiquidity);
        }

        let strategy = Self::match_strategy(&env, credit_score, duration)?;

        let financing = Financing {
            invoice_id,
            strategy_id: strategy.id,
            amount,
            outstanding: amount,
            financed_at: env.ledger().timestamp(),
        };
        env.storage()
            .instance()
            .set(&DataKey::Financing(invoice_id), &financing);
        env.storage().instance().set(
            &DataKey::TotalFinanced,
            &(total_financed
                .checked_add(amount)
                .ok_or(Error::InvalidAmount)?),
        );

        let mut accounting = Self::read_accounting(&env);
        accounting.total_financed = accounting
            .total_financed
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        env.storage()
            .instance()
            .set(&DataKey::Accounting, &accounting);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &invoice.issuer, &amount);

        Self::recompute_apy(&env);

        env.events().publish(
            (Symbol::new(&env, "invoice_financed"), invoice_id),
            InvoiceFinancedEvent {
                invoice_id,
                strategy_id: strategy.id,
                amount,
                issuer: invoice.issuer,
            },
        );

        Self::release_guard(&env);
        Ok(strategy.id)
    }

    /// Record a repayment against a financed invoice. Principal reduces the
    /// outstanding advance; anything above it accrues to the pool as yield.
    pub fn record_repayment(
        env: Env,
        invoice_id: u64,
        payer: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        payer.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        let mut financing: Financing = env
            .storage()
            .instance()
            .get(&DataKey::Financing(invoice_id))
            .ok_or(Error::FinancingNotFound)?;

        if financing.outstanding == 0 {
            return Err(Error::AlreadyRepaid);
        }

        let principal = if amount < financing.outstanding {
            amount
        } else {
            financing.outstanding
        };
        let yield_amount = amount - principal;

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_financed = Self::read_i128(&env, &DataKey::TotalFinanced);

        financing.outstanding -= principal;
        env.storage()
            .instance()
            .set(&DataKey::Financing(invoice_id), &financing);
        env.storage()
            .instance()
            .set(&DataKey::TotalFinanced, &(total_financed - principal));
        env.storage().instance().set(
            &DataKey::TotalAssets,
            &(total_assets
                .checked_add(yield_amount)
                .ok_or(Error::InvalidAmount)?),
        );

        let mut accounting = Self::read_accounting(&env);
        accounting.total_repaid = accounting
            .total_repaid
            .checked_add(principal)
            .ok_or(Error::InvalidAmount)?;
        accounting.total_yield = accounting
            .total_yield
            .checked_add(yield_amount)
            .ok_or(Error::InvalidAmount)?;
        env.storage()
            .instance()
            .set(&DataKey::Accounting, &accounting);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&payer, &env.current_contract_address(), &amount);

        Self::recompute_apy(&env);

        env.events().publish(
            (Symbol::new(&env, "repayment"), invoice_id),
            RepaymentEvent {
                invoice_id,
                amount,
                principal,
                yield_amount,
                outstanding: financing.outstanding,
            },
        );

        Self::release_guard(&env);
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_position(env: Env, investor: Address) -> Result<PoolPosition, Error> {
        Self::read_position(&env, &investor).ok_or(Error::PositionNotFound)
    }

    /// Reward claimable right now, including the not-yet-folded interval
    pub fn pending_reward(env: Env, investor: Address) -> i128 {
        let Some(mut position) = Self::read_position(&env, &investor) else {
            return 0;
        };

        let total_assets = Self::read_i128(&env, &DataKey::TotalAssets);
        let total_supply = Self::read_i128(&env, &DataKey::TotalSupply);
        Self::fold_rewards(&env, &mut position, total_assets, total_supply);

        position.accrued_reward
    }

    pub fn get_strategy(env: Env, strategy_id: u32) -> Result<Strategy, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Strategy(strategy_id))
            .ok_or(Error::StrategyNotFound)
    }

    pub fn strategy_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::StrategyCount)
            .unwrap_or(0)
    }

    pub fn get_financing(env: Env, invoice_id: u64) -> Result<Financing, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Financing(invoice_id))
            .ok_or(Error::FinancingNotFound)
    }

    pub fn total_assets(env: Env) -> i128 {
        Self::read_i128(&env, &DataKey::TotalAssets)
    }

    pub fn total_supply(env: Env) -> i128 {
        Self::read_i128(&env, &DataKey::TotalSupply)
    }

    pub fn total_financed(env: Env) -> i128 {
        Self::read_i128(&env, &DataKey::TotalFinanced)
    }

    pub fn utilization(env: Env) -> i128 {
        utilization_bps(
            Self::read_i128(&env, &DataKey::TotalFinanced),
            Self::read_i128(&env, &DataKey::TotalAssets),
        )
    }

    pub fn pool_apy(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::PoolApyBps)
            .unwrap_or_else(|| apy_for_utilization(0))
    }

    pub fn get_accounting(env: Env) -> Accounting {
        Self::read_accounting(&env)
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

    fn check_params(params: &PoolParams) -> Result<(), Error> {
        let bps_fields = [
            params.deposit_fee_bps,
            params.withdrawal_fee_bps,
            params.performance_fee_bps,
            params.early_penalty_bps,
        ];
        for bps in bps_fields {
            if bps < 0 || bps > BASIS_POINTS {
                return Err(Error::InvalidAmount);
            }
        }

        if params.pool_cap <= 0
            || params.min_deposit <= 0
            || params.max_deposit < params.min_deposit
        {
            return Err(Error::InvalidAmount);
        }

        Ok(())
    }

    fn read_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn read_position(env: &Env, investor: &Address) -> Option<PoolPosition> {
        env.storage()
            .instance()
            .get(&DataKey::Position(investor.clone()))
    }

    fn read_i128(env: &Env, key: &DataKey) -> i128 {
        env.storage().instance().get(key).unwrap_or(0)
    }

    fn read_accounting(env: &Env) -> Accounting {
        env.storage()
            .instance()
            .get(&DataKey::Accounting)
            .unwrap_or(Accounting {
                total_financed: 0,
                total_repaid: 0,
                total_yield: 0,
            })
    }

    fn bps_of(amount: i128, bps: i128) -> Result<i128, Error> {
        amount
            .checked_mul(bps)
            .and_then(|v| v.checked_div(BASIS_POINTS))
            .ok_or(Error::InvalidAmount)
    }

    /// Fold the interval since last_claim into accrued_reward and reset the
    /// clock. user_assets = total_assets * user_share_bps / 10,000.
    fn fold_rewards(
        env: &Env,
        position: &mut PoolPosition,
        total_assets: i128,
        total_supply: i128,
    ) {
        let now = env.ledger().timestamp();

        if position.shares > 0 && now > position.last_claim {
            let apy_bps = Self::pool_apy(env.clone());
            let share_bps = user_share_bps(position.shares, total_supply).unwrap_or(0);
            let user_assets = total_assets
                .checked_mul(share_bps)
                .and_then(|v| v.checked_div(BASIS_POINTS))
                .unwrap_or(0);
            let accrued =
                accrued_over(user_assets, apy_bps, now - position.last_claim).unwrap_or(0);
            position.accrued_reward += accrued;
        }

        position.last_claim = now;
    }

    fn recompute_apy(env: &Env) {
        let utilization = utilization_bps(
            Self::read_i128(env, &DataKey::TotalFinanced),
            Self::read_i128(env, &DataKey::TotalAssets),
        );
        let apy = apy_for_utilization(utilization);
        let previous = Self::pool_apy(env.clone());

        if apy != previous {
            env.storage().instance().set(&DataKey::PoolApyBps, &apy);
            env.events().publish(
                (Symbol::new(env, "apy_updated"),),
                ApyUpdatedEvent {
                    utilization_bps: utilization,
                    apy_bps: apy,
                },
            );
        }
    }

    /// Most conservative compatible strategy: among active strategies whose
    /// floor the invoice clears, pick the highest floor
    fn match_strategy(env: &Env, credit_score: u32, duration: u64) -> Result<Strategy, Error> {
        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::StrategyCount)
            .unwrap_or(0);

        let mut best: Option<Strategy> = None;
        for id in 1..=count {
            let Some(strategy) = env
                .storage()
                .instance()
                .get::<DataKey, Strategy>(&DataKey::Strategy(id))
            else {
                continue;
            };

            if !strategy.active
                || credit_score < strategy.min_credit_score
                || duration > strategy.max_duration
            {
                continue;
            }

            let better = match &best {
                Some(current) => strategy.min_credit_score > current.min_credit_score,
                None => true,
            };
            if better {
                best = Some(strategy);
            }
        }

        best.ok_or(Error::NoMatchingStrategy)
    }

    fn fetch_invoice(env: &Env, config: &Config, invoice_id: u64) -> Invoice {
        env.invoke_contract(
            &config.invoice_token,
            &Symbol::new(env, "get_invoice"),
            vec![env, invoice_id.into_val(env)],
        )
    }
}
