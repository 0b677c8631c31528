use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::UserAccount;

#[derive(Accounts)]
pub struct InitUser<'info> {
    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_SEED, user.key().as_ref()],
        bump,
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitUser>) -> Result<()> {
    let user_account = &mut ctx.accounts.user_account;
    require!(!user_account.is_initialized, LendingError::AlreadyInitialized);

    let clock = Clock::get()?;
    user_account.owner = ctx.accounts.user.key();
    user_account.token_balances = [0; MAX_COLLATERAL_TOKENS];
    user_account.total_collateral_usd = 0;
    user_account.total_debt_usd = 0;
    user_account.last_accrual_timestamp = clock.unix_timestamp;
    user_account.liquidation_count = 0;
    user_account.has_active_loan = false;
    user_account.is_initialized = true;
    user_account.bump = ctx.bumps.user_account;

    msg!("Ledger entry created for: {}", user_account.owner);

    Ok(())
}
