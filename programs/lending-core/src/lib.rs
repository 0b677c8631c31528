use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod oracle;
pub mod state;
pub mod utils;

use instructions::*;

#[program]
pub mod lending_core {
    use super::*;

    /// Initialize the protocol configuration
    /// Callable once; the admin is fixed forever at this point
    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        interest_rate_bps: u64,
        liquidation_threshold_bps: u64,
        price_stale_threshold_seconds: u64,
    ) -> Result<()> {
        instructions::init_config::handler(
            ctx,
            interest_rate_bps,
            liquidation_threshold_bps,
            price_stale_threshold_seconds,
        )
    }

    /// Update protocol parameters
    /// Admin only; the admin identity itself cannot be reassigned
    pub fn update_params(
        ctx: Context<UpdateProtocolParams>,
        params: crate::instructions::update_params::UpdateParams,
    ) -> Result<()> {
        instructions::update_params::handler(ctx, params)
    }

    /// Register a collateral token with its custodial vault and price feed
    /// Admin only, once per mint
    pub fn register_token(ctx: Context<RegisterToken>) -> Result<()> {
        instructions::register_token::handler(ctx)
    }

    /// Create the caller's ledger entry
    pub fn init_user(ctx: Context<InitUser>) -> Result<()> {
        instructions::init_user::handler(ctx)
    }

    /// Deposit collateral into the caller's ledger entry
    /// Remaining accounts: (vault, price_feed) pairs for every held token
    pub fn deposit<'info>(
        ctx: Context<'_, '_, 'info, 'info, Deposit<'info>>,
        token_index: u8,
        amount: u64,
    ) -> Result<()> {
        instructions::deposit::handler(ctx, token_index, amount)
    }

    /// Withdraw collateral if the position stays within the safe ratio
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        token_index: u8,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw::handler(ctx, token_index, amount)
    }

    /// Borrow USD against deposited collateral
    pub fn borrow<'info>(
        ctx: Context<'_, '_, 'info, 'info, Borrow<'info>>,
        usd_amount: u64,
    ) -> Result<()> {
        instructions::borrow::handler(ctx, usd_amount)
    }

    /// Repay outstanding USD debt
    pub fn repay(ctx: Context<Repay>, usd_amount: u64) -> Result<()> {
        instructions::repay::handler(ctx, usd_amount)
    }

    /// Liquidate an undercollateralized position
    /// Anyone can call when the debt/collateral ratio is tripped
    pub fn liquidate<'info>(ctx: Context<'_, '_, 'info, 'info, Liquidate<'info>>) -> Result<()> {
        instructions::liquidate::handler(ctx)
    }

    /// Read a validated, fresh price from a raw feed record
    pub fn fetch_price(ctx: Context<FetchPrice>) -> Result<u64> {
        instructions::fetch_price::handler(ctx)
    }
}
