#![no_std]

mod error;
mod events;
mod storage;
mod validation;

pub use error::Error;
pub use storage::{Bid, Config, DataKey, Listing, BASIS_POINTS, MAX_LISTING_DURATION};

use events::*;
use storage::Invoice;
use validation::{platform_fee, seller_proceeds};

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct FundingMarket;

#[contractimpl]
impl FundingMarket {
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
    // LISTINGS
    // ============================================

    /// List the caller's whole stake in a verified, unpaid invoice
    ///
    /// # Errors
    /// - `NotListable`: Invoice unverified or already paid
    /// - `NoShares`: Seller holds no shares
    /// - `InvalidDuration`: Zero or above the 365-day cap
    /// - `ListingActive`: A live listing already exists for this invoice
    pub fn list_for_sale(
        env: Env,
        seller: Address,
        invoice_id: u64,
        price: i128,
        duration: u64,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        seller.require_auth();

        if price <= 0 {
            return Err(Error::InvalidAmount);
        }

        if duration == 0 || duration > MAX_LISTING_DURATION {
            return Err(Error::InvalidDuration);
        }

        let config = Self::read_config(&env)?;
        let now = env.ledger().timestamp();

        if let Some(existing) = Self::read_listing(&env, invoice_id) {
            if existing.active && now <= existing.expires_at {
                return Err(Error::ListingActive);
            }
        }

        let invoice = Self::fetch_invoice(&env, &config, invoice_id);
        if !invoice.verified || invoice.paid {
            return Err(Error::NotListable);
        }

        let shares = Self::fetch_balance(&env, &config, invoice_id, &seller);
        if shares <= 0 {
            return Err(Error::NoShares);
        }

        // A stale highest bid from a lapsed listing is returned before the
        // invoice is re-listed, so no bidder funds strand under the new
        // auction.
        Self::refund_highest_bid(&env, &config, invoice_id)?;

        let listing = Listing {
            invoice_id,
            seller: seller.clone(),
            price,
            shares,
            active: true,
            created_at: now,
            expires_at: now + duration,
        };

        env.storage()
            .instance()
            .set(&DataKey::Listing(invoice_id), &listing);

        env.events().publish(
            (Symbol::new(&env, "listed"), invoice_id),
            ListedEvent {
                invoice_id,
                seller,
                price,
                shares,
                expires_at: listing.expires_at,
            },
        );

        Ok(())
    }

    /// Buy a listing at its asking price
    ///
    /// Shares move, the seller is paid net of the platform fee, overpayment
    /// is refunded and the listing deactivates in a single transaction.
    ///
    /// # Errors
    /// - `ListingInactive` / `ListingExpired`
    /// - `SelfPurchase`: Buyer is the seller
    /// - `InsufficientPayment`: payment < price
    pub fn buy_listing(
        env: Env,
        buyer: Address,
        invoice_id: u64,
        payment: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        buyer.require_auth();

        let config = Self::read_config(&env)?;
        let mut listing = Self::read_listing(&env, invoice_id).ok_or(Error::ListingNotFound)?;

        if !listing.active {
            return Err(Error::ListingInactive);
        }

        if env.ledger().timestamp() > listing.expires_at {
            return Err(Error::ListingExpired);
        }

        if buyer == listing.seller {
            return Err(Error::SelfPurchase);
        }

        if payment < listing.price {
            return Err(Error::InsufficientPayment);
        }

        let fee = platform_fee(listing.price, config.platform_fee_bps).ok_or(Error::InvalidAmount)?;
        let proceeds =
            seller_proceeds(listing.price, config.platform_fee_bps).ok_or(Error::InvalidAmount)?;
        let refund = payment - listing.price;

        // State first, value movement after
        listing.active = false;
        env.storage()
            .instance()
            .set(&DataKey::Listing(invoice_id), &listing);

        Self::move_shares(&env, &config, invoice_id, &listing.seller, &buyer, listing.shares);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&buyer, &env.current_contract_address(), &payment);
        stablecoin.transfer(&env.current_contract_address(), &listing.seller, &proceeds);
        if fee > 0 {
            stablecoin.transfer(&env.current_contract_address(), &config.fee_recipient, &fee);
        }
        if refund > 0 {
            stablecoin.transfer(&env.current_contract_address(), &buyer, &refund);
        }

        env.events().publish(
            (Symbol::new(&env, "listing_sold"), invoice_id),
            ListingSoldEvent {
                invoice_id,
                seller: listing.seller,
                buyer,
                price: listing.price,
                fee,
                refunded: refund,
            },
        );

        Self::release_guard(&env);
        Ok(())
    }

    /// Cancel an unsold listing; any live highest bid is refunded
    pub fn cancel_listing(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        let config = Self::read_config(&env)?;
        let mut listing = Self::read_listing(&env, invoice_id).ok_or(Error::ListingNotFound)?;

        if !listing.active {
            return Err(Error::ListingInactive);
        }

        listing.seller.require_auth();

        listing.active = false;
        env.storage()
            .instance()
            .set(&DataKey::Listing(invoice_id), &listing);

        Self::refund_highest_bid(&env, &config, invoice_id)?;

        env.events().publish(
            (Symbol::new(&env, "listing_cancelled"), invoice_id),
            ListingCancelledEvent {
                invoice_id,
                seller: listing.seller,
            },
        );

        Ok(())
    }

    // ============================================
    // BIDDING
    // ============================================

    /// Place a bid that strictly exceeds the current highest
    ///
    /// The superseded highest bidder is refunded in full before the new
    /// bid's funds are taken, so no outbid party ever has funds at risk.
    ///
    /// # Errors
    /// - `BidTooLow`: Not strictly above the current highest
    /// - `SelfBid`: Seller bidding on own listing
    pub fn place_bid(
        env: Env,
        bidder: Address,
        invoice_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        bidder.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::read_config(&env)?;
        let listing = Self::read_listing(&env, invoice_id).ok_or(Error::ListingNotFound)?;

        if !listing.active {
            return Err(Error::ListingInactive);
        }

        if env.ledger().timestamp() > listing.expires_at {
            return Err(Error::ListingExpired);
        }

        if bidder == listing.seller {
            return Err(Error::SelfBid);
        }

        let previous = Self::read_highest(&env, invoice_id)
            .and_then(|holder| Self::read_bid(&env, invoice_id, &holder))
            .filter(|bid| bid.active);

        if let Some(ref prev) = previous {
            if amount <= prev.amount {
                return Err(Error::BidTooLow);
            }
        }

        let mut outbid_refund: i128 = 0;

        // Deactivate the superseded bid and record the new highest before
        // any funds move
        if let Some(mut prev) = previous {
            prev.active = false;
            env.storage()
                .instance()
                .set(&DataKey::Bid(invoice_id, prev.bidder.clone()), &prev);
            outbid_refund = prev.amount;

            let stablecoin = token::Client::new(&env, &config.stablecoin);
            stablecoin.transfer(&env.current_contract_address(), &prev.bidder, &prev.amount);
        }

        let bid = Bid {
            invoice_id,
            bidder: bidder.clone(),
            amount,
            active: true,
        };
        env.storage()
            .instance()
            .set(&DataKey::Bid(invoice_id, bidder.clone()), &bid);
        env.storage()
            .instance()
            .set(&DataKey::HighestBidder(invoice_id), &bidder);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&bidder, &env.current_contract_address(), &amount);

        env.events().publish(
            (Symbol::new(&env, "bid_placed"), invoice_id),
            BidPlacedEvent {
                invoice_id,
                bidder,
                amount,
                outbid_refund,
            },
        );

        Self::release_guard(&env);
        Ok(())
    }

    /// Seller accepts the current highest bid
    pub fn accept_bid(env: Env, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        let config = Self::read_config(&env)?;
        let mut listing = Self::read_listing(&env, invoice_id).ok_or(Error::ListingNotFound)?;

        if !listing.active {
            return Err(Error::ListingInactive);
        }

        listing.seller.require_auth();

        let highest = Self::read_highest(&env, invoice_id).ok_or(Error::NoHighestBid)?;
        let mut bid = Self::read_bid(&env, invoice_id, &highest).ok_or(Error::NoHighestBid)?;

        if !bid.active {
            return Err(Error::NoHighestBid);
        }

        let fee = platform_fee(bid.amount, config.platform_fee_bps).ok_or(Error::InvalidAmount)?;
        let proceeds =
            seller_proceeds(bid.amount, config.platform_fee_bps).ok_or(Error::InvalidAmount)?;

        listing.active = false;
        bid.active = false;
        env.storage()
            .instance()
            .set(&DataKey::Listing(invoice_id), &listing);
        env.storage()
            .instance()
            .set(&DataKey::Bid(invoice_id, highest.clone()), &bid);
        env.storage()
            .instance()
            .remove(&DataKey::HighestBidder(invoice_id));

        Self::move_shares(&env, &config, invoice_id, &listing.seller, &highest, listing.shares);

        // Bid funds are already escrowed here
        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &listing.seller, &proceeds);
        if fee > 0 {
            stablecoin.transfer(&env.current_contract_address(), &config.fee_recipient, &fee);
        }

        env.events().publish(
            (Symbol::new(&env, "bid_accepted"), invoice_id),
            BidAcceptedEvent {
                invoice_id,
                seller: listing.seller,
                bidder: highest,
                amount: bid.amount,
                fee,
            },
        );

        Self::release_guard(&env);
        Ok(())
    }

    /// Withdraw a still-active bid for a full refund
    ///
    /// The current highest bidder may only withdraw once the auction is no
    /// longer live (listing expired or deactivated).
    pub fn withdraw_bid(env: Env, bidder: Address, invoice_id: u64) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::take_guard(&env)?;

        bidder.require_auth();

        let config = Self::read_config(&env)?;
        let mut bid = Self::read_bid(&env, invoice_id, &bidder).ok_or(Error::BidNotFound)?;

        if !bid.active {
            return Err(Error::BidInactive);
        }

        let is_highest = Self::read_highest(&env, invoice_id)
            .map(|holder| holder == bidder)
            .unwrap_or(false);

        if is_highest {
            let auction_live = Self::read_listing(&env, invoice_id)
                .map(|listing| listing.active && env.ledger().timestamp() <= listing.expires_at)
                .unwrap_or(false);

            if auction_live {
                return Err(Error::CannotWithdrawHighest);
            }

            env.storage()
                .instance()
                .remove(&DataKey::HighestBidder(invoice_id));
        }

        bid.active = false;
        env.storage()
            .instance()
            .set(&DataKey::Bid(invoice_id, bidder.clone()), &bid);

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&env.current_contract_address(), &bidder, &bid.amount);

        env.events().publish(
            (Symbol::new(&env, "bid_withdrawn"), invoice_id),
            BidWithdrawnEvent {
                invoice_id,
                bidder,
                amount: bid.amount,
            },
        );

        Self::release_guard(&env);
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_listing(env: Env, invoice_id: u64) -> Result<Listing, Error> {
        Self::read_listing(&env, invoice_id).ok_or(Error::ListingNotFound)
    }

    pub fn get_bid(env: Env, invoice_id: u64, bidder: Address) -> Result<Bid, Error> {
        Self::read_bid(&env, invoice_id, &bidder).ok_or(Error::BidNotFound)
    }

    pub fn get_highest_bidder(env: Env, invoice_id: u64) -> Option<Address> {
        Self::read_highest(&env, invoice_id)
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

    fn read_listing(env: &Env, invoice_id: u64) -> Option<Listing> {
        env.storage().instance().get(&DataKey::Listing(invoice_id))
    }

    fn read_bid(env: &Env, invoice_id: u64, bidder: &Address) -> Option<Bid> {
        env.storage()
            .instance()
            .get(&DataKey::Bid(invoice_id, bidder.clone()))
    }

    fn read_highest(env: &Env, invoice_id: u64) -> Option<Address> {
        env.storage()
            .instance()
            .get(&DataKey::HighestBidder(invoice_id))
    }

    /// Refund and deactivate the live highest bid, if one exists
    fn refund_highest_bid(env: &Env, config: &Config, invoice_id: u64) -> Result<(), Error> {
        if let Some(holder) = Self::read_highest(env, invoice_id) {
            if let Some(mut bid) = Self::read_bid(env, invoice_id, &holder) {
                if bid.active {
                    bid.active = false;
                    env.storage()
                        .instance()
                        .set(&DataKey::Bid(invoice_id, holder.clone()), &bid);

                    let stablecoin = token::Client::new(env, &config.stablecoin);
                    stablecoin.transfer(&env.current_contract_address(), &holder, &bid.amount);
                }
            }
            env.storage()
                .instance()
                .remove(&DataKey::HighestBidder(invoice_id));
        }
        Ok(())
    }

    fn fetch_invoice(env: &Env, config: &Config, invoice_id: u64) -> Invoice {
        env.invoke_contract(
            &config.invoice_token,
            &Symbol::new(env, "get_invoice"),
            vec![env, invoice_id.into_val(env)],
        )
    }

    fn fetch_balance(env: &Env, config: &Config, invoice_id: u64, holder: &Address) -> i128 {
        env.invoke_contract(
            &config.invoice_token,
            &Symbol::new(env, "balance_of"),
            vec![env, invoice_id.into_val(env), holder.to_val()],
        )
    }

    fn move_shares(
        env: &Env,
        config: &Config,
        invoice_id: u64,
        from: &Address,
        to: &Address,
        amount: i128,
    ) {
        env.invoke_contract::<()>(
            &config.invoice_token,
            &Symbol::new(env, "move_shares"),
            vec![
                env,
                env.current_contract_address().to_val(),
                invoice_id.into_val(env),
                from.to_val(),
                to.to_val(),
                amount.into_val(env),
            ],
        );
    }
}
