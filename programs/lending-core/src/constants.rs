// PDA Seeds
pub const CONFIG_SEED: &[u8] = b"config";
pub const USER_SEED: &[u8] = b"user";
pub const VAULT_SEED: &[u8] = b"vault";
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

// Precision Constants
pub const BPS_PRECISION: u64 = 10_000; // Basis points precision
pub const SECONDS_PER_YEAR: u64 = 31_536_000; // 365 days

// Protocol Parameters (basis points)
pub const LIQUIDATION_BONUS_BPS: u64 = 600; // 6% of seized value goes to the liquidator
pub const MAX_CONFIDENCE_BPS: u64 = 500; // 5% max price confidence deviation

// Registry capacity: one slot per entry in UserAccount.token_balances
pub const MAX_COLLATERAL_TOKENS: usize = 8;

// Price record wire format
pub const PRICE_RECORD_MAGIC: u32 = 0x6f72_636c; // "orcl" LE
pub const PRICE_RECORD_VERSION: u32 = 2;
pub const PRICE_ACCOUNT_TYPE: u32 = 3; // price account, as opposed to product/mapping
pub const PRICE_RECORD_FIXED_LEN: usize = 197; // header through proof length prefix
pub const PUBLISH_TIME_TOLERANCE_SECONDS: i64 = 60; // allowed clock skew into the future
pub const MAX_PRICE_EXPONENT: i32 = 12;
