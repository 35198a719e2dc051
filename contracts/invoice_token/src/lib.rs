#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::{Config, DataKey, Invoice, Role, BASIS_POINTS, MAX_TOTAL_SHARES};

use events::*;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Vec};

#[contract]
pub struct InvoiceToken;

#[contractimpl]
impl InvoiceToken {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the registry
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        fee_recipient: Address,
        transfer_fee_bps: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if transfer_fee_bps < 0 || transfer_fee_bps > BASIS_POINTS {
            return Err(Error::InvalidAmount);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                fee_recipient,
                transfer_fee_bps,
                version: 1,
            },
        );
        env.storage().instance().set(&DataKey::InvoiceCounter, &0u64);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    /// Replace the fee configuration, bumping its version
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn update_config(
        env: Env,
        fee_recipient: Address,
        transfer_fee_bps: i128,
    ) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if transfer_fee_bps < 0 || transfer_fee_bps > BASIS_POINTS {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        env.storage().instance().set(
            &DataKey::Config,
            &Config {
                fee_recipient,
                transfer_fee_bps,
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

    /// Grant or revoke a role for an address
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn set_role(env: Env, addr: Address, role: Role, enabled: bool) -> Result<(), Error> {
        Self::require_admin(&env)?;

        let key = DataKey::Role(addr, role);
        if enabled {
            env.storage().instance().set(&key, &true);
        } else {
            env.storage().instance().remove(&key);
        }

        Ok(())
    }

    /// Register a sibling contract (market, escrow, tracker, pool) as operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage()
            .instance()
            .set(&DataKey::Operator(operator), &true);
        Ok(())
    }

    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().remove(&DataKey::Operator(operator));
        Ok(())
    }

    // ============================================
    // TOKENIZATION
    // ============================================

    /// Mint an invoice record and its full share supply to the issuer
    ///
    /// # Errors
    /// - `DuplicateExternalId`: An invoice with this external id exists
    /// - `InvalidShareCount`: total_shares outside (0, MAX_TOTAL_SHARES]
    /// - `InvalidAmount`: face_value <= 0
    /// - `DueDateNotFuture`: due_date not after the current ledger time
    pub fn tokenize(
        env: Env,
        issuer: Address,
        external_id: String,
        face_value: i128,
        total_shares: i128,
        due_date: u64,
        debtor: Address,
        industry: String,
    ) -> Result<u64, Error> {
        Self::check_initialized(&env)?;
        Self::check_not_paused(&env)?;

        issuer.require_auth();

        if env
            .storage()
            .instance()
            .has(&DataKey::ExternalId(external_id.clone()))
        {
            return Err(Error::DuplicateExternalId);
        }

        if total_shares <= 0 || total_shares > MAX_TOTAL_SHARES {
            return Err(Error::InvalidShareCount);
        }

        if face_value <= 0 {
            return Err(Error::InvalidAmount);
        }

        if due_date <= env.ledger().timestamp() {
            return Err(Error::DueDateNotFuture);
        }

        let counter: u64 = env
            .storage()
            .instance()
            .get(&DataKey::InvoiceCounter)
            .unwrap_or(0);
        let invoice_id = counter + 1;

        let invoice = Invoice {
            id: invoice_id,
            external_id: external_id.clone(),
            face_value,
            total_shares,
            due_date,
            issuer: issuer.clone(),
            debtor: debtor.clone(),
            industry,
            created_at: env.ledger().timestamp(),
            verified: false,
            paid: false,
            settled: false,
        };

        env.storage()
            .instance()
            .set(&DataKey::Invoice(invoice_id), &invoice);
        env.storage()
            .instance()
            .set(&DataKey::ExternalId(external_id.clone()), &invoice_id);
        env.storage()
            .instance()
            .set(&DataKey::InvoiceCounter, &invoice_id);

        // All shares start with the issuer
        Self::credit(&env, invoice_id, &issuer, total_shares)?;

        env.events().publish(
            (Symbol::new(&env, "tokenized"), invoice_id),
            TokenizedEvent {
                invoice_id,
                external_id,
                issuer,
                debtor,
                face_value,
                total_shares,
                due_date,
            },
        );

        Ok(invoice_id)
    }

    /// Mark an invoice verified; restricted to the Verifier role
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks the Verifier role
    /// - `InvoiceNotFound`: Unknown invoice id
    /// - `AlreadyVerified`: Flag already set (loud, to surface caller bugs)
    pub fn verify(env: Env, caller: Address, invoice_id: u64) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        Self::check_not_paused(&env)?;

        caller.require_auth();
        Self::require_role(&env, &caller, Role::Verifier)?;

        let mut invoice = Self::read_invoice(&env, invoice_id)?;

        if invoice.verified {
            return Err(Error::AlreadyVerified);
        }

        invoice.verified = true;
        env.storage()
            .instance()
            .set(&DataKey::Invoice(invoice_id), &invoice);

        env.events().publish(
            (Symbol::new(&env, "verified"), invoice_id),
            VerifiedEvent {
                invoice_id,
                verifier: caller,
            },
        );

        Ok(())
    }

    // ============================================
    // SHARE TRANSFERS
    // ============================================

    /// Holder-authorized transfer with bps fee skim
    ///
    /// # Errors
    /// - `NotVerified`: Invoice not yet verified
    /// - `InsufficientShares`: amount exceeds `from`'s balance
    /// - `InvalidAmount`: amount <= 0
    pub fn transfer(
        env: Env,
        invoice_id: u64,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        Self::check_not_paused(&env)?;

        from.require_auth();

        Self::apply_transfer(&env, invoice_id, &from, &to, amount)
    }

    /// Operator-gated transfer used by marketplace sale and bid acceptance;
    /// same fee and conservation semantics, without holder auth
    ///
    /// # Errors
    /// - `NotOperator`: Caller not registered as operator
    pub fn move_shares(
        env: Env,
        operator: Address,
        invoice_id: u64,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        Self::check_not_paused(&env)?;

        operator.require_auth();
        if !Self::is_operator(env.clone(), operator) {
            return Err(Error::NotOperator);
        }

        Self::apply_transfer(&env, invoice_id, &from, &to, amount)
    }

    // ============================================
    // LIFECYCLE FLAGS
    // ============================================

    /// Set the paid flag; operator contracts only
    ///
    /// # Errors
    /// - `AlreadyPaid`: Flag already set
    pub fn mark_paid(env: Env, operator: Address, invoice_id: u64) -> Result<(), Error> {
        Self::check_initialized(&env)?;

        operator.require_auth();
        if !Self::is_operator(env.clone(), operator) {
            return Err(Error::NotOperator);
        }

        let mut invoice = Self::read_invoice(&env, invoice_id)?;

        if invoice.paid {
            return Err(Error::AlreadyPaid);
        }

        invoice.paid = true;
        env.storage()
            .instance()
            .set(&DataKey::Invoice(invoice_id), &invoice);

        env.events().publish(
            (Symbol::new(&env, "invoice_paid"), invoice_id),
            InvoicePaidEvent { invoice_id },
        );

        Ok(())
    }

    /// Set the terminal settled flag (implies paid); operator contracts only
    ///
    /// # Errors
    /// - `AlreadySettled`: Record already terminal
    pub fn mark_settled(env: Env, operator: Address, invoice_id: u64) -> Result<(), Error> {
        Self::check_initialized(&env)?;

        operator.require_auth();
        if !Self::is_operator(env.clone(), operator) {
            return Err(Error::NotOperator);
        }

        let mut invoice = Self::read_invoice(&env, invoice_id)?;

        if invoice.settled {
            return Err(Error::AlreadySettled);
        }

        invoice.settled = true;
        invoice.paid = true;
        env.storage()
            .instance()
            .set(&DataKey::Invoice(invoice_id), &invoice);

        env.events().publish(
            (Symbol::new(&env, "invoice_settled"), invoice_id),
            InvoiceSettledEvent { invoice_id },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_invoice(env: Env, invoice_id: u64) -> Result<Invoice, Error> {
        Self::read_invoice(&env, invoice_id)
    }

    pub fn balance_of(env: Env, invoice_id: u64, holder: Address) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::Balance(invoice_id, holder))
            .unwrap_or(0)
    }

    /// Addresses currently holding a non-zero balance of the invoice
    pub fn holders(env: Env, invoice_id: u64) -> Vec<Address> {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Address>>(&DataKey::Holders(invoice_id))
            .unwrap_or_else(|| Vec::new(&env))
    }

    /// Holder with the largest balance; ties resolve to the earliest listed
    pub fn majority_holder(env: Env, invoice_id: u64) -> Result<Address, Error> {
        let holders = Self::holders(env.clone(), invoice_id);

        let mut best: Option<Address> = None;
        let mut best_balance: i128 = 0;
        for holder in holders.iter() {
            let balance = Self::balance_of(env.clone(), invoice_id, holder.clone());
            if balance > best_balance {
                best_balance = balance;
                best = Some(holder);
            }
        }

        best.ok_or(Error::InvoiceNotFound)
    }

    /// Sum of all holder balances; equals total_shares at all times
    pub fn share_supply(env: Env, invoice_id: u64) -> i128 {
        let holders = Self::holders(env.clone(), invoice_id);
        let mut total: i128 = 0;
        for holder in holders.iter() {
            total += Self::balance_of(env.clone(), invoice_id, holder);
        }
        total
    }

    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operator(address))
            .unwrap_or(false)
    }

    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Role(address, role))
            .unwrap_or(false)
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        Self::read_config(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

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

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn require_role(env: &Env, addr: &Address, role: Role) -> Result<(), Error> {
        let granted = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Role(addr.clone(), role))
            .unwrap_or(false);

        if !granted {
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

    fn read_invoice(env: &Env, invoice_id: u64) -> Result<Invoice, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Invoice(invoice_id))
            .ok_or(Error::InvoiceNotFound)
    }

    /// Debit `from`, credit `to` with amount - fee and the fee recipient with
    /// fee. The three legs always sum to zero, so share conservation holds
    /// exactly regardless of truncation.
    fn apply_transfer(
        env: &Env,
        invoice_id: u64,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let invoice = Self::read_invoice(env, invoice_id)?;
        if !invoice.verified {
            return Err(Error::NotVerified);
        }

        let config = Self::read_config(env)?;
        let fee = amount
            .checked_mul(config.transfer_fee_bps)
            .and_then(|v| v.checked_div(BASIS_POINTS))
            .ok_or(Error::InvalidAmount)?;

        Self::debit(env, invoice_id, from, amount)?;
        Self::credit(env, invoice_id, to, amount - fee)?;
        Self::credit(env, invoice_id, &config.fee_recipient, fee)?;

        env.events().publish(
            (Symbol::new(env, "share_transfer"), invoice_id),
            ShareTransferEvent {
                invoice_id,
                from: from.clone(),
                to: to.clone(),
                amount,
                fee,
            },
        );

        Ok(())
    }

    fn credit(env: &Env, invoice_id: u64, addr: &Address, amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }

        let key = DataKey::Balance(invoice_id, addr.clone());
        let balance = env
            .storage()
            .instance()
            .get::<DataKey, i128>(&key)
            .unwrap_or(0);

        let new_balance = balance.checked_add(amount).ok_or(Error::InvalidAmount)?;
        env.storage().instance().set(&key, &new_balance);

        if balance == 0 {
            let mut holders = Self::holders(env.clone(), invoice_id);
            holders.push_back(addr.clone());
            env.storage()
                .instance()
                .set(&DataKey::Holders(invoice_id), &holders);
        }

        Ok(())
    }

    fn debit(env: &Env, invoice_id: u64, addr: &Address, amount: i128) -> Result<(), Error> {
        let key = DataKey::Balance(invoice_id, addr.clone());
        let balance = env
            .storage()
            .instance()
            .get::<DataKey, i128>(&key)
            .unwrap_or(0);

        if balance < amount {
            return Err(Error::InsufficientShares);
        }

        let new_balance = balance - amount;
        if new_balance == 0 {
            env.storage().instance().remove(&key);

            let holders = Self::holders(env.clone(), invoice_id);
            let mut remaining = Vec::new(env);
            for holder in holders.iter() {
                if holder != *addr {
                    remaining.push_back(holder);
                }
            }
            env.storage()
                .instance()
                .set(&DataKey::Holders(invoice_id), &remaining);
        } else {
            env.storage().instance().set(&key, &new_balance);
        }

        Ok(())
    }
}
