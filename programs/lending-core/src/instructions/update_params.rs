use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;
use crate::state::ProtocolConfig;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UpdateParams {
    pub interest_rate_bps: Option<u64>,
    pub liquidation_threshold_bps: Option<u64>,
    pub price_stale_threshold_seconds: Option<u64>,
}

#[derive(Accounts)]
pub struct UpdateProtocolParams<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = protocol_config.bump,
        has_one = admin @ LendingError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    pub admin: Signer<'info>,
}

pub fn handler(ctx: Context<UpdateProtocolParams>, params: UpdateParams) -> Result<()> {
    let config = &mut ctx.accounts.protocol_config;

    let interest_rate_bps = params.interest_rate_bps.unwrap_or(config.interest_rate_bps);
    let liquidation_threshold_bps = params
        .liquidation_threshold_bps
        .unwrap_or(config.liquidation_threshold_bps);
    let price_stale_threshold_seconds = params
        .price_stale_threshold_seconds
        .unwrap_or(config.price_stale_threshold_seconds);

    ProtocolConfig::validate_params(
        interest_rate_bps,
        liquidation_threshold_bps,
        price_stale_threshold_seconds,
    )?;

    config.interest_rate_bps = interest_rate_bps;
    config.liquidation_threshold_bps = liquidation_threshold_bps;
    config.price_stale_threshold_seconds = price_stale_threshold_seconds;

    msg!(
        "Protocol params updated: interest {} bps, liquidation threshold {} bps, price staleness {}s",
        interest_rate_bps,
        liquidation_threshold_bps,
        price_stale_threshold_seconds
    );

    Ok(())
}
