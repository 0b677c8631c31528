use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::{CollateralVault, ProtocolConfig, UserAccount};
use crate::utils::{collect_prices, is_within_safe_ratio};

#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    #[account(
        seeds = [VAULT_SEED, protocol_config.admin.as_ref(), token_mint.key().as_ref()],
        bump = collateral_vault.bump,
    )]
    pub collateral_vault: Account<'info, CollateralVault>,

    #[account(
        mut,
        constraint = user_token_account.mint == token_mint.key() @ LendingError::InvalidTokenMint,
        constraint = user_token_account.owner == owner.key() @ LendingError::InvalidTokenOwner,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.key() == collateral_vault.vault_address @ LendingError::InvalidVaultAddress,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// CHECK: PDA that has authority over every custodial vault account
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub token_mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
    token_index: u8,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, LendingError::InvalidAmount);
    require!(
        ctx.accounts.collateral_vault.token_index == token_index,
        LendingError::UnknownToken
    );

    let clock = Clock::get()?;
    let interest_rate_bps = ctx.accounts.protocol_config.interest_rate_bps;
    let liquidation_threshold_bps = ctx.accounts.protocol_config.liquidation_threshold_bps;
    let price_stale_threshold_seconds = ctx.accounts.protocol_config.price_stale_threshold_seconds;

    ctx.accounts
        .user_account
        .accrue_interest(clock.unix_timestamp, interest_rate_bps)?;

    // Debit first; if the ratio check or the outbound transfer fails, the
    // whole instruction reverts and the debit is undone with it.
    ctx.accounts.user_account.debit(token_index, amount)?;

    let price_accounts: Vec<&AccountInfo> = ctx.remaining_accounts.iter().collect();
    let prices = collect_prices(
        &price_accounts,
        price_stale_threshold_seconds,
        clock.unix_timestamp,
    )?;
    let (collateral_usd, debt_usd) = ctx.accounts.user_account.revalue(&prices)?;

    if ctx.accounts.user_account.has_active_loan {
        require!(
            is_within_safe_ratio(collateral_usd, debt_usd, liquidation_threshold_bps),
            LendingError::WithdrawalExceedsSafeRatio
        );
    }

    let vault_authority_bump = ctx.bumps.vault_authority;
    let vault_authority_seeds = &[VAULT_AUTHORITY_SEED, &[vault_authority_bump]];
    let signer_seeds = &[&vault_authority_seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.vault_token_account.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: ctx.accounts.vault_authority.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(
        CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
        amount,
    )?;

    msg!(
        "Withdrew {} units of token {} for {}",
        amount,
        token_index,
        ctx.accounts.owner.key()
    );
    msg!(
        "Collateral: {} cents, debt: {} cents",
        collateral_usd,
        debt_usd
    );

    emit!(CollateralWithdrawn {
        owner: ctx.accounts.owner.key(),
        token_index,
        amount,
        total_collateral_usd: collateral_usd,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct CollateralWithdrawn {
    pub owner: Pubkey,
    pub token_index: u8,
    pub amount: u64,
    pub total_collateral_usd: u64,
    pub timestamp: i64,
}
