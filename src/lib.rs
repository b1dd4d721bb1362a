//! Read-only client for the Cosmos SDK LCD (REST) endpoints a validator
//! monitor needs: validator info, delegation counts, rewards, balances and
//! slashing/staking params.
pub mod address;
pub mod config;
pub mod error;
pub mod http;
pub mod lcd;
pub mod types;

pub use crate::config::{AppConfig, ChainConfig, Query};
pub use crate::error::{Error, QueryError};
pub use crate::lcd::{Lcd, QueryResult};
