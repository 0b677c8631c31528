use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::{CollateralVault, ProtocolConfig, UserAccount};
use crate::utils::{
    calculate_seize_value, calculate_seized_amount, collect_prices, is_within_safe_ratio,
};

#[derive(Accounts)]
pub struct Liquidate<'info> {
    #[account(
        mut,
        seeds = [USER_SEED, target_owner.key().as_ref()],
        bump = user_account.bump,
        constraint = user_account.owner == target_owner.key() @ LendingError::Unauthorized,
    )]
    pub user_account: Account<'info, UserAccount>,

    /// The principal being liquidated
    /// CHECK: identity only, bound to the ledger entry by the seeds above
    pub target_owner: UncheckedAccount<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// CHECK: PDA that has authority over every custodial vault account
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub liquidator: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Liquidate an undercollateralized position.
///
/// Remaining accounts carry one quadruple per token the target holds:
/// `(collateral_vault, price_feed, vault_token_account,
/// liquidator_token_account)`. The health check runs against prices read in
/// this very instruction, so a position can only be seized if it is
/// unhealthy at execution time.
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, Liquidate<'info>>) -> Result<()> {
    let clock = Clock::get()?;
    let interest_rate_bps = ctx.accounts.protocol_config.interest_rate_bps;
    let liquidation_threshold_bps = ctx.accounts.protocol_config.liquidation_threshold_bps;
    let price_stale_threshold_seconds = ctx.accounts.protocol_config.price_stale_threshold_seconds;

    ctx.accounts
        .user_account
        .accrue_interest(clock.unix_timestamp, interest_rate_bps)?;

    // First pass: validate each quadruple and split it into the price pairs
    // and the transfer routes.
    let groups = ctx.remaining_accounts;
    require!(groups.len() % 4 == 0, LendingError::MissingPriceFeed);

    let mut price_pairs: Vec<&'info AccountInfo<'info>> = Vec::with_capacity(groups.len() / 2);
    let mut routes: Vec<(u8, AccountInfo<'info>, AccountInfo<'info>)> =
        Vec::with_capacity(groups.len() / 4);
    let mut seen = [false; MAX_COLLATERAL_TOKENS];

    for group in groups.chunks_exact(4) {
        let vault = Account::<CollateralVault>::try_from(&group[0])
            .map_err(|_| error!(LendingError::UnknownToken))?;
        require!(vault.is_initialized, LendingError::UnknownToken);

        let index = vault.token_index as usize;
        require!(index < MAX_COLLATERAL_TOKENS, LendingError::InvalidTokenIndex);
        require!(!seen[index], LendingError::InvalidTokenIndex);
        seen[index] = true;

        require_keys_eq!(
            group[2].key(),
            vault.vault_address,
            LendingError::InvalidVaultAddress
        );
        let liquidator_token_account = Account::<TokenAccount>::try_from(&group[3])
            .map_err(|_| error!(LendingError::InvalidTokenMint))?;
        require_keys_eq!(
            liquidator_token_account.mint,
            vault.token_mint,
            LendingError::InvalidTokenMint
        );
        require_keys_eq!(
            liquidator_token_account.owner,
            ctx.accounts.liquidator.key(),
            LendingError::InvalidTokenOwner
        );

        price_pairs.push(&group[0]);
        price_pairs.push(&group[1]);
        routes.push((vault.token_index, group[2].clone(), group[3].clone()));
    }

    let prices = collect_prices(
        &price_pairs,
        price_stale_threshold_seconds,
        clock.unix_timestamp,
    )?;
    let (collateral_usd, debt_usd) = ctx.accounts.user_account.revalue(&prices)?;

    // The ratio must actually be tripped right now; a liquidation attempt
    // against a healthy position is an error, not a no-op.
    require!(
        !is_within_safe_ratio(collateral_usd, debt_usd, liquidation_threshold_bps),
        LendingError::PositionHealthy
    );

    let seize_value_usd = calculate_seize_value(debt_usd, collateral_usd)?;

    let vault_authority_bump = ctx.bumps.vault_authority;
    let vault_authority_seeds = &[VAULT_AUTHORITY_SEED, &[vault_authority_bump]];
    let signer_seeds = &[&vault_authority_seeds[..]];

    for (token_index, vault_token_account, liquidator_token_account) in routes {
        let balance = ctx.accounts.user_account.token_balances[token_index as usize];
        let seized = calculate_seized_amount(balance, seize_value_usd, collateral_usd)?;
        if seized == 0 {
            continue;
        }
        ctx.accounts.user_account.debit(token_index, seized)?;

        let cpi_accounts = Transfer {
            from: vault_token_account,
            to: liquidator_token_account,
            authority: ctx.accounts.vault_authority.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        token::transfer(
            CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
            seized,
        )?;

        msg!("Seized {} units of token {}", seized, token_index);
    }

    ctx.accounts.user_account.set_debt(0);
    let (remaining_collateral_usd, _) = ctx.accounts.user_account.revalue(&prices)?;
    let user_account = &mut ctx.accounts.user_account;
    user_account.liquidation_count = user_account.liquidation_count.saturating_add(1);

    msg!(
        "Liquidated {}: cleared {} cents of debt, seized {} cents of collateral, {} cents remain",
        user_account.owner,
        debt_usd,
        seize_value_usd,
        remaining_collateral_usd
    );

    emit!(PositionLiquidated {
        owner: user_account.owner,
        liquidator: ctx.accounts.liquidator.key(),
        debt_cleared_usd: debt_usd,
        collateral_seized_usd: seize_value_usd,
        remaining_collateral_usd,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct PositionLiquidated {
    pub owner: Pubkey,
    pub liquidator: Pubkey,
    pub debt_cleared_usd: u64,
    pub collateral_seized_usd: u64,
    pub remaining_collateral_usd: u64,
    pub timestamp: i64,
}
