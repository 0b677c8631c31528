use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::ProtocolConfig;

#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init_if_needed,
        payer = admin,
        space = ProtocolConfig::LEN,
        seeds = [CONFIG_SEED],
        bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeConfig>,
    interest_rate_bps: u64,
    liquidation_threshold_bps: u64,
    price_stale_threshold_seconds: u64,
) -> Result<()> {
    let config = &mut ctx.accounts.protocol_config;
    require!(!config.is_initialized, LendingError::AlreadyInitialized);
    ProtocolConfig::validate_params(
        interest_rate_bps,
        liquidation_threshold_bps,
        price_stale_threshold_seconds,
    )?;

    config.admin = ctx.accounts.admin.key();
    config.interest_rate_bps = interest_rate_bps;
    config.liquidation_threshold_bps = liquidation_threshold_bps;
    config.price_stale_threshold_seconds = price_stale_threshold_seconds;
    config.registered_tokens = 0;
    config.is_initialized = true;
    config.bump = ctx.bumps.protocol_config;

    msg!("Protocol config initialized with admin: {}", config.admin);
    msg!(
        "Interest: {} bps, liquidation threshold: {} bps, price staleness: {}s",
        interest_rate_bps,
        liquidation_threshold_bps,
        price_stale_threshold_seconds
    );

    Ok(())
}
