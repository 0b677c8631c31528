use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::{CollateralVault, ProtocolConfig};

#[derive(Accounts)]
pub struct RegisterToken<'info> {
    #[account(
        init_if_needed,
        payer = admin,
        space = CollateralVault::LEN,
        seeds = [VAULT_SEED, admin.key().as_ref(), token_mint.key().as_ref()],
        bump,
    )]
    pub collateral_vault: Account<'info, CollateralVault>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = protocol_config.bump,
        has_one = admin @ LendingError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_mint: Account<'info, Mint>,

    /// Custodial token account for deposits of this mint
    #[account(
        constraint = vault_address.mint == token_mint.key() @ LendingError::InvalidTokenMint,
        constraint = vault_address.owner == vault_authority.key() @ LendingError::InvalidVaultAddress,
    )]
    pub vault_address: Account<'info, TokenAccount>,

    /// CHECK: PDA that has authority over every custodial vault account
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: raw price record; its layout is strictly validated on every read
    pub price_feed: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RegisterToken>) -> Result<()> {
    let vault = &mut ctx.accounts.collateral_vault;
    let config = &mut ctx.accounts.protocol_config;

    require!(!vault.is_initialized, LendingError::DuplicateVault);
    require!(
        (config.registered_tokens as usize) < MAX_COLLATERAL_TOKENS,
        LendingError::VaultLimitReached
    );

    vault.token_mint = ctx.accounts.token_mint.key();
    vault.vault_address = ctx.accounts.vault_address.key();
    vault.price_feed = ctx.accounts.price_feed.key();
    vault.token_index = config.registered_tokens;
    vault.token_decimals = ctx.accounts.token_mint.decimals;
    vault.is_initialized = true;
    vault.bump = ctx.bumps.collateral_vault;

    config.registered_tokens += 1;

    msg!(
        "Registered token {} at index {} (decimals {}), vault {}, feed {}",
        vault.token_mint,
        vault.token_index,
        vault.token_decimals,
        vault.vault_address,
        vault.price_feed
    );

    Ok(())
}
