use anchor_lang::prelude::*;

use crate::constants::BPS_PRECISION;
use crate::errors::LendingError;

/// Global protocol configuration
/// One instance per deployment, derived from a fixed seed
#[account]
pub struct ProtocolConfig {
    /// Protocol admin; the only principal allowed to register tokens or
    /// change parameters. Never reassigned after initialization.
    pub admin: Pubkey,

    /// Annualized borrow rate in basis points (e.g., 300 = 3.00%)
    pub interest_rate_bps: u64,

    /// Max debt/collateral ratio in basis points (e.g., 8000 = 80%)
    pub liquidation_threshold_bps: u64,

    /// Max accepted oracle price age in seconds (e.g., 10800 = 3 hours)
    pub price_stale_threshold_seconds: u64,

    /// Vaults registered so far; doubles as the next token index
    pub registered_tokens: u8,

    /// Guards against re-initialization
    pub is_initialized: bool,

    /// PDA bump
    pub bump: u8,
}

impl ProtocolConfig {
    pub const LEN: usize = 8 + // discriminator
        32 + // admin
        8 + // interest_rate_bps
        8 + // liquidation_threshold_bps
        8 + // price_stale_threshold_seconds
        1 + // registered_tokens
        1 + // is_initialized
        1; // bump

    /// Range checks shared by initialization and parameter updates.
    pub fn validate_params(
        interest_rate_bps: u64,
        liquidation_threshold_bps: u64,
        price_stale_threshold_seconds: u64,
    ) -> Result<()> {
        require!(
            interest_rate_bps <= BPS_PRECISION,
            LendingError::InvalidParameter
        );
        require!(
            liquidation_threshold_bps > 0 && liquidation_threshold_bps <= BPS_PRECISION,
            LendingError::InvalidParameter
        );
        require!(
            price_stale_threshold_seconds > 0,
            LendingError::InvalidParameter
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sane_params() {
        assert!(ProtocolConfig::validate_params(300, 8_000, 10_800).is_ok());
        assert!(ProtocolConfig::validate_params(0, 10_000, 1).is_ok());
    }

    #[test]
    fn rejects_out_of_range_params() {
        assert!(ProtocolConfig::validate_params(10_001, 8_000, 10_800).is_err());
        assert!(ProtocolConfig::validate_params(300, 0, 10_800).is_err());
        assert!(ProtocolConfig::validate_params(300, 10_001, 10_800).is_err());
        assert!(ProtocolConfig::validate_params(300, 8_000, 0).is_err());
    }
}
