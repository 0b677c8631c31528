pub mod borrow;
pub mod deposit;
pub mod fetch_price;
pub mod init_config;
pub mod init_user;
pub mod liquidate;
pub mod register_token;
pub mod repay;
pub mod update_params;
pub mod withdraw;

pub use borrow::*;
pub use deposit::*;
pub use fetch_price::*;
pub use init_config::*;
pub use init_user::*;
pub use liquidate::*;
pub use register_token::*;
pub use repay::*;
pub use update_params::*;
pub use withdraw::*;
