use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Error;

/// Every query the gateway can issue. Each one can be switched off per chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Validator,
    Delegations,
    Unbonds,
    SelfDelegation,
    Validators,
    Commission,
    Rewards,
    Balance,
    SigningInfo,
    SlashingParams,
    StakingParams,
}

impl Query {
    pub const ALL: [Query; 11] = [
        Query::Validator,
        Query::Delegations,
        Query::Unbonds,
        Query::SelfDelegation,
        Query::Validators,
        Query::Commission,
        Query::Rewards,
        Query::Balance,
        Query::SigningInfo,
        Query::SlashingParams,
        Query::StakingParams,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Query::Validator => "validator",
            Query::Delegations => "delegations",
            Query::Unbonds => "unbonds",
            Query::SelfDelegation => "self-delegation",
            Query::Validators => "validators",
            Query::Commission => "commission",
            Query::Rewards => "rewards",
            Query::Balance => "balance",
            Query::SigningInfo => "signing-info",
            Query::SlashingParams => "slashing-params",
            Query::StakingParams => "staking-params",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::ALL
            .into_iter()
            .find(|query| query.name() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown query `{s}`")))
    }
}

/// Per-chain query switches. Anything not listed is enabled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "HashMap<String, bool>")]
pub struct QueryToggles(HashMap<Query, bool>);

impl QueryToggles {
    pub fn with(mut self, query: Query, enabled: bool) -> Self {
        self.0.insert(query, enabled);
        self
    }

    pub fn is_enabled(&self, query: Query) -> bool {
        self.0.get(&query).copied().unwrap_or(true)
    }
}

impl TryFrom<HashMap<String, bool>> for QueryToggles {
    type Error = Error;

    fn try_from(raw: HashMap<String, bool>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(name, enabled)| Ok((name.parse::<Query>()?, enabled)))
            .collect::<Result<HashMap<_, _>, Error>>()
            .map(QueryToggles)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidatorConfig {
    pub address: String,
    #[serde(default)]
    pub consensus_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainConfig {
    pub name: String,
    pub lcd_endpoint: String,
    #[serde(default)]
    pub bech_wallet_prefix: Option<String>,
    #[serde(default)]
    pub validators: Vec<ValidatorConfig>,
    #[serde(default)]
    pub queries: QueryToggles,
}

impl ChainConfig {
    pub fn new(name: impl Into<String>, lcd_endpoint: impl Into<String>) -> Self {
        ChainConfig {
            name: name.into(),
            lcd_endpoint: lcd_endpoint.into(),
            bech_wallet_prefix: None,
            validators: Vec::new(),
            queries: QueryToggles::default(),
        }
    }

    pub fn query_enabled(&self, query: Query) -> bool {
        self.queries.is_enabled(query)
    }

    fn validate(&mut self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidConfig("chain name is empty".to_string()));
        }
        self.lcd_endpoint = self.lcd_endpoint.trim_end_matches('/').to_string();
        if self.lcd_endpoint.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "chain {}: lcd-endpoint is empty",
                self.name
            )));
        }
        if self.validators.iter().any(|v| v.address.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "chain {}: validator address is empty",
                self.name
            )));
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_log_level", alias = "log_level")]
    pub log_level: String,
    pub chains: Vec<ChainConfig>,
}

impl AppConfig {
    /// Loads `path` (extension optional) with `LCD_MONITOR_*` environment
    /// overrides on top.
    pub fn load(path: &str) -> Result<Self, Error> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("LCD_MONITOR").try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, Error> {
        let mut app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Looks a chain up by name, or returns the first one.
    pub fn chain(&self, name: Option<&str>) -> Result<&ChainConfig, Error> {
        match name {
            Some(name) => self
                .chains
                .iter()
                .find(|chain| chain.name == name)
                .ok_or_else(|| Error::UnknownChain(name.to_string())),
            None => self
                .chains
                .first()
                .ok_or_else(|| Error::InvalidConfig("no chains configured".to_string())),
        }
    }

    fn validate(&mut self) -> Result<(), Error> {
        if self.chains.is_empty() {
            return Err(Error::InvalidConfig("no chains configured".to_string()));
        }
        self.chains.iter_mut().try_for_each(ChainConfig::validate)
    }
}
