use anchor_lang::prelude::*;

/// Registry entry for one supported collateral token
/// One per (admin, token_mint), created by `register_token`
#[account]
pub struct CollateralVault {
    /// Mint of the accepted SPL token
    pub token_mint: Pubkey,

    /// Custodial token account holding deposits of this mint; its authority
    /// is the program's vault authority PDA
    pub vault_address: Pubkey,

    /// Oracle account supplying the USD price for this mint
    pub price_feed: Pubkey,

    /// Slot into UserAccount.token_balances, assigned at registration
    pub token_index: u8,

    /// Mint decimals, captured at registration
    pub token_decimals: u8,

    /// Guards against duplicate registration
    pub is_initialized: bool,

    /// PDA bump
    pub bump: u8,
}

impl CollateralVault {
    pub const LEN: usize = 8 + // discriminator
        32 + // token_mint
        32 + // vault_address
        32 + // price_feed
        1 + // token_index
        1 + // token_decimals
        1 + // is_initialized
        1; // bump
}
