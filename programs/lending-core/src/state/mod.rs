pub mod collateral_vault;
pub mod config;
pub mod user_account;

pub use collateral_vault::*;
pub use config::*;
pub use user_account::*;
