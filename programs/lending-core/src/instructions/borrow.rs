use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::{ProtocolConfig, UserAccount};
use crate::utils::{calculate_max_borrowable, collect_prices};

#[derive(Accounts)]
pub struct Borrow<'info> {
    #[account(
        mut,
        seeds = [USER_SEED, owner.key().as_ref()],
        bump = user_account.bump,
        constraint = user_account.owner == owner.key() @ LendingError::Unauthorized,
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    pub owner: Signer<'info>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Borrow<'info>>,
    usd_amount: u64,
) -> Result<()> {
    require!(usd_amount > 0, LendingError::InvalidAmount);

    let clock = Clock::get()?;
    let interest_rate_bps = ctx.accounts.protocol_config.interest_rate_bps;
    let liquidation_threshold_bps = ctx.accounts.protocol_config.liquidation_threshold_bps;
    let price_stale_threshold_seconds = ctx.accounts.protocol_config.price_stale_threshold_seconds;

    ctx.accounts
        .user_account
        .accrue_interest(clock.unix_timestamp, interest_rate_bps)?;

    let price_accounts: Vec<&AccountInfo> = ctx.remaining_accounts.iter().collect();
    let prices = collect_prices(
        &price_accounts,
        price_stale_threshold_seconds,
        clock.unix_timestamp,
    )?;
    let (collateral_usd, debt_usd) = ctx.accounts.user_account.revalue(&prices)?;

    let max_borrowable =
        calculate_max_borrowable(collateral_usd, debt_usd, liquidation_threshold_bps)?;
    require!(usd_amount <= max_borrowable, LendingError::ExceedsBorrowLimit);

    let new_debt = debt_usd
        .checked_add(usd_amount)
        .ok_or(error!(LendingError::MathOverflow))?;
    ctx.accounts.user_account.set_debt(new_debt);

    msg!(
        "Borrowed {} cents for {}; debt now {} cents against {} cents collateral",
        usd_amount,
        ctx.accounts.owner.key(),
        new_debt,
        collateral_usd
    );

    emit!(LoanBorrowed {
        owner: ctx.accounts.owner.key(),
        usd_amount,
        total_debt_usd: new_debt,
        total_collateral_usd: collateral_usd,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct LoanBorrowed {
    pub owner: Pubkey,
    pub usd_amount: u64,
    pub total_debt_usd: u64,
    pub total_collateral_usd: u64,
    pub timestamp: i64,
}
