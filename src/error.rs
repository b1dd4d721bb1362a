use thiserror::Error;

use crate::types::QueryInfo;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error during LCD request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("error decoding LCD response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("expected code 0, but got {code}")]
    UnexpectedCode { code: i64 },
    #[error("cannot convert amount `{amount}` to a number")]
    InvalidAmount { amount: String },
    #[error("error loading config: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("chain `{0}` is not configured")]
    UnknownChain(String),
    #[error("{0}")]
    Address(String),
}

/// A failed gateway query. The call metadata is kept for observability even
/// though there is no result.
#[derive(Debug, Error)]
#[error("query to {} failed: {source}", .info.url)]
pub struct QueryError {
    pub info: QueryInfo,
    pub source: Error,
}
