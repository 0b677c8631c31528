use anchor_lang::prelude::*;

#[error_code]
pub enum LendingError {
    #[msg("Only the protocol admin can perform this action")]
    Unauthorized,

    #[msg("Account is already initialized")]
    AlreadyInitialized,

    #[msg("A vault is already registered for this token mint")]
    DuplicateVault,

    #[msg("Token registry is full")]
    VaultLimitReached,

    #[msg("No vault registered for this token")]
    UnknownToken,

    #[msg("Insufficient deposited balance")]
    InsufficientBalance,

    #[msg("Requested amount exceeds the borrow limit")]
    ExceedsBorrowLimit,

    #[msg("Price record is malformed or has the wrong magic/version")]
    InvalidOracleFormat,

    #[msg("Price record does not belong to the expected feed")]
    FeedMismatch,

    #[msg("Price is stale or published in the future")]
    StalePrice,

    #[msg("No price supplied for a held collateral token")]
    MissingPriceFeed,

    #[msg("Price confidence interval too wide")]
    ConfidenceTooWide,

    #[msg("Withdrawal would push debt past the safe ratio")]
    WithdrawalExceedsSafeRatio,

    #[msg("Repay amount exceeds outstanding debt")]
    OverRepayment,

    #[msg("Position is healthy, cannot liquidate")]
    PositionHealthy,

    #[msg("Invalid amount")]
    InvalidAmount,

    #[msg("Invalid token index")]
    InvalidTokenIndex,

    #[msg("Invalid protocol parameter")]
    InvalidParameter,

    #[msg("Token mint does not match")]
    InvalidTokenMint,

    #[msg("Token account owner does not match")]
    InvalidTokenOwner,

    #[msg("Vault address does not match collateral vault")]
    InvalidVaultAddress,

    #[msg("Math overflow")]
    MathOverflow,
}
