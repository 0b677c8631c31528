use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::oracle;
use crate::state::CollateralVault;

/// A fresh, validated USD price for one registered token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPrice {
    /// USD cents per whole token.
    pub price_cents: u64,
    /// Decimals of the token mint, for projecting raw units.
    pub decimals: u8,
}

/// USD value in cents of `amount` raw units, rounded down.
pub fn calculate_collateral_value(amount: u64, price_cents: u64, token_decimals: u8) -> Result<u64> {
    let scale = 10u128
        .checked_pow(token_decimals as u32)
        .ok_or(error!(LendingError::MathOverflow))?;
    let value = (amount as u128)
        .checked_mul(price_cents as u128)
        .ok_or(error!(LendingError::MathOverflow))?
        / scale;
    u64::try_from(value).map_err(|_| error!(LendingError::MathOverflow))
}

/// Interest owed on `debt_cents` after `elapsed_seconds`, rounded up so the
/// protocol is never undercharged.
pub fn calculate_accrued_interest(
    debt_cents: u64,
    interest_rate_bps: u64,
    elapsed_seconds: u64,
) -> Result<u64> {
    if debt_cents == 0 || elapsed_seconds == 0 || interest_rate_bps == 0 {
        return Ok(0);
    }
    let numerator = (debt_cents as u128)
        .checked_mul(interest_rate_bps as u128)
        .ok_or(error!(LendingError::MathOverflow))?
        .checked_mul(elapsed_seconds as u128)
        .ok_or(error!(LendingError::MathOverflow))?;
    let denominator = (BPS_PRECISION as u128) * (SECONDS_PER_YEAR as u128);
    u64::try_from(numerator.div_ceil(denominator)).map_err(|_| error!(LendingError::MathOverflow))
}

/// Remaining borrow capacity in cents, floored.
pub fn calculate_max_borrowable(
    collateral_cents: u64,
    debt_cents: u64,
    liquidation_threshold_bps: u64,
) -> Result<u64> {
    let limit = (collateral_cents as u128)
        .checked_mul(liquidation_threshold_bps as u128)
        .ok_or(error!(LendingError::MathOverflow))?
        / (BPS_PRECISION as u128);
    let limit = u64::try_from(limit).map_err(|_| error!(LendingError::MathOverflow))?;
    Ok(limit.saturating_sub(debt_cents))
}

/// Debt within the threshold-bounded fraction of collateral value.
pub fn is_within_safe_ratio(
    collateral_cents: u64,
    debt_cents: u64,
    liquidation_threshold_bps: u64,
) -> bool {
    (debt_cents as u128) * (BPS_PRECISION as u128)
        <= (collateral_cents as u128) * (liquidation_threshold_bps as u128)
}

/// Collateral value to seize when liquidating: outstanding debt plus the
/// liquidator bonus, rounded up, capped at what the position holds.
pub fn calculate_seize_value(debt_cents: u64, collateral_cents: u64) -> Result<u64> {
    let gross = (debt_cents as u128)
        .checked_mul((BPS_PRECISION + LIQUIDATION_BONUS_BPS) as u128)
        .ok_or(error!(LendingError::MathOverflow))?
        .div_ceil(BPS_PRECISION as u128);
    Ok(gross.min(collateral_cents as u128) as u64)
}

/// Raw units to seize from one token balance, proportional to the seized
/// share of total collateral value, rounded up.
pub fn calculate_seized_amount(
    balance: u64,
    seize_value_cents: u64,
    collateral_value_cents: u64,
) -> Result<u64> {
    if collateral_value_cents == 0 || balance == 0 {
        return Ok(0);
    }
    let seized = (balance as u128)
        .checked_mul(seize_value_cents as u128)
        .ok_or(error!(LendingError::MathOverflow))?
        .div_ceil(collateral_value_cents as u128);
    let seized = u64::try_from(seized).map_err(|_| error!(LendingError::MathOverflow))?;
    Ok(seized.min(balance))
}

/// Reject prices whose confidence interval is too wide a fraction of the
/// price itself.
pub fn check_confidence(price_cents: u64, conf_cents: u64) -> Result<()> {
    require!(
        (conf_cents as u128) * (BPS_PRECISION as u128)
            <= (price_cents as u128) * (MAX_CONFIDENCE_BPS as u128),
        LendingError::ConfidenceTooWide
    );
    Ok(())
}

/// Resolve fresh prices for every `(CollateralVault, price_feed)` pair passed
/// in an instruction's remaining accounts.
///
/// Each vault account must be one of this program's initialized vaults and
/// must be paired with exactly the feed it was registered with. Prices land
/// in a per-token-index table for `UserAccount::revalue`.
pub fn collect_prices<'info>(
    accounts: &[&'info AccountInfo<'info>],
    price_stale_threshold_seconds: u64,
    now: i64,
) -> Result<[Option<TokenPrice>; MAX_COLLATERAL_TOKENS]> {
    let mut prices = [None; MAX_COLLATERAL_TOKENS];
    require!(accounts.len() % 2 == 0, LendingError::MissingPriceFeed);

    for pair in accounts.chunks_exact(2) {
        let vault = Account::<CollateralVault>::try_from(pair[0])
            .map_err(|_| error!(LendingError::UnknownToken))?;
        require!(vault.is_initialized, LendingError::UnknownToken);

        let feed_info = pair[1];
        require_keys_eq!(feed_info.key(), vault.price_feed, LendingError::FeedMismatch);

        let data = feed_info.try_borrow_data()?;
        let (price_cents, conf_cents) = oracle::read_price(
            &data[..],
            &vault.price_feed.to_bytes(),
            now,
            price_stale_threshold_seconds,
        )?;
        check_confidence(price_cents, conf_cents)?;

        let index = vault.token_index as usize;
        require!(index < MAX_COLLATERAL_TOKENS, LendingError::InvalidTokenIndex);
        prices[index] = Some(TokenPrice {
            price_cents,
            decimals: vault.token_decimals,
        });
    }

    Ok(prices)
}
