use anchor_lang::prelude::*;

use crate::constants::*;
use crate::oracle;
use crate::state::ProtocolConfig;

#[derive(Accounts)]
pub struct FetchPrice<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// CHECK: raw price record, strictly validated by the reader
    pub price_feed: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<FetchPrice>) -> Result<u64> {
    let clock = Clock::get()?;
    let data = ctx.accounts.price_feed.try_borrow_data()?;
    let (price_cents, conf_cents) = oracle::read_price(
        &data[..],
        &ctx.accounts.price_feed.key().to_bytes(),
        clock.unix_timestamp,
        ctx.accounts.protocol_config.price_stale_threshold_seconds,
    )?;

    msg!(
        "Feed {}: {} cents (confidence {} cents)",
        ctx.accounts.price_feed.key(),
        price_cents,
        conf_cents
    );

    Ok(price_cents)
}
