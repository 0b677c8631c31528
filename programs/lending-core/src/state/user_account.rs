use anchor_lang::prelude::*;

use crate::constants::MAX_COLLATERAL_TOKENS;
use crate::errors::LendingError;
use crate::utils::{calculate_accrued_interest, calculate_collateral_value, TokenPrice};

/// Per-principal ledger entry
/// Tracks raw per-token deposits, USD aggregates, and loan state
#[account]
pub struct UserAccount {
    /// The principal this ledger entry belongs to
    pub owner: Pubkey,

    /// Deposited amount per registered token index, in raw token units
    pub token_balances: [u64; MAX_COLLATERAL_TOKENS],

    /// Collateral value in USD cents, recomputed by `revalue`
    pub total_collateral_usd: u64,

    /// Outstanding debt in USD cents
    pub total_debt_usd: u64,

    /// Timestamp of the last interest accrual
    pub last_accrual_timestamp: i64,

    /// Lifetime liquidations against this account
    pub liquidation_count: u32,

    /// True iff total_debt_usd > 0
    pub has_active_loan: bool,

    /// Guards against re-initialization
    pub is_initialized: bool,

    /// PDA bump
    pub bump: u8,
}

impl UserAccount {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        8 * MAX_COLLATERAL_TOKENS + // token_balances
        8 + // total_collateral_usd
        8 + // total_debt_usd
        8 + // last_accrual_timestamp
        4 + // liquidation_count
        1 + // has_active_loan
        1 + // is_initialized
        1; // bump

    fn balance_slot(token_index: u8) -> Result<usize> {
        let index = token_index as usize;
        require!(index < MAX_COLLATERAL_TOKENS, LendingError::InvalidTokenIndex);
        Ok(index)
    }

    /// Add deposited units to one token balance.
    pub fn credit(&mut self, token_index: u8, amount: u64) -> Result<()> {
        let slot = Self::balance_slot(token_index)?;
        self.token_balances[slot] = self.token_balances[slot]
            .checked_add(amount)
            .ok_or(error!(LendingError::MathOverflow))?;
        Ok(())
    }

    /// Remove deposited units from one token balance.
    pub fn debit(&mut self, token_index: u8, amount: u64) -> Result<()> {
        let slot = Self::balance_slot(token_index)?;
        self.token_balances[slot] = self.token_balances[slot]
            .checked_sub(amount)
            .ok_or(error!(LendingError::InsufficientBalance))?;
        Ok(())
    }

    /// Recompute the USD aggregates from current balances and fresh prices.
    ///
    /// The only path that mutates `total_collateral_usd`, so raw balances and
    /// their USD projection cannot drift apart. Every nonzero balance must
    /// have a price supplied.
    pub fn revalue(
        &mut self,
        prices: &[Option<TokenPrice>; MAX_COLLATERAL_TOKENS],
    ) -> Result<(u64, u64)> {
        let mut collateral: u64 = 0;
        for (index, &balance) in self.token_balances.iter().enumerate() {
            if balance == 0 {
                continue;
            }
            let price = prices[index].ok_or(error!(LendingError::MissingPriceFeed))?;
            let value = calculate_collateral_value(balance, price.price_cents, price.decimals)?;
            collateral = collateral
                .checked_add(value)
                .ok_or(error!(LendingError::MathOverflow))?;
        }
        self.total_collateral_usd = collateral;
        Ok((self.total_collateral_usd, self.total_debt_usd))
    }

    /// Set outstanding debt and refresh the loan-activity flag.
    pub fn set_debt(&mut self, new_debt_usd: u64) {
        self.total_debt_usd = new_debt_usd;
        self.has_active_loan = new_debt_usd > 0;
    }

    /// Lazily fold accrued interest into the debt.
    ///
    /// Runs at the top of every ledger-mutating operation. The accrual clock
    /// only moves forward.
    pub fn accrue_interest(&mut self, now: i64, interest_rate_bps: u64) -> Result<()> {
        let elapsed = now.saturating_sub(self.last_accrual_timestamp);
        if elapsed <= 0 {
            return Ok(());
        }
        self.last_accrual_timestamp = now;
        if self.total_debt_usd == 0 {
            return Ok(());
        }
        let interest =
            calculate_accrued_interest(self.total_debt_usd, interest_rate_bps, elapsed as u64)?;
        let new_debt = self
            .total_debt_usd
            .checked_add(interest)
            .ok_or(error!(LendingError::MathOverflow))?;
        self.set_debt(new_debt);
        Ok(())
    }
}
