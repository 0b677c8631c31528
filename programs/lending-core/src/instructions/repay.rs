use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::{ProtocolConfig, UserAccount};

#[derive(Accounts)]
pub struct Repay<'info> {
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

pub fn handler(ctx: Context<Repay>, usd_amount: u64) -> Result<()> {
    require!(usd_amount > 0, LendingError::InvalidAmount);

    let clock = Clock::get()?;
    let interest_rate_bps = ctx.accounts.protocol_config.interest_rate_bps;

    let user_account = &mut ctx.accounts.user_account;
    user_account.accrue_interest(clock.unix_timestamp, interest_rate_bps)?;

    // An excess payment is rejected rather than capped so callers catch
    // amount-calculation bugs instead of silently losing the difference.
    let debt_usd = user_account.total_debt_usd;
    require!(usd_amount <= debt_usd, LendingError::OverRepayment);

    let new_debt = debt_usd - usd_amount;
    user_account.set_debt(new_debt);

    msg!(
        "Repaid {} cents for {}; debt now {} cents",
        usd_amount,
        ctx.accounts.owner.key(),
        new_debt
    );

    emit!(LoanRepaid {
        owner: ctx.accounts.owner.key(),
        usd_amount,
        total_debt_usd: new_debt,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct LoanRepaid {
    pub owner: Pubkey,
    pub usd_amount: u64,
    pub total_debt_usd: u64,
    pub timestamp: i64,
}
