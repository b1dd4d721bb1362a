use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// The gRPC gateway renders unset fields as `null`, read those as the default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A coin as the LCD renders it, amounts are strings (integers or decimals).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coin {
    #[serde(deserialize_with = "nullable")]
    pub denom: String,
    #[serde(deserialize_with = "nullable")]
    pub amount: String,
}

/// Normalized coin amount handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub amount: f64,
    pub denom: String,
}

impl TryFrom<&Coin> for Balance {
    type Error = Error;

    fn try_from(coin: &Coin) -> Result<Self, Self::Error> {
        let amount = coin
            .amount
            .parse::<f64>()
            .map_err(|_| Error::InvalidAmount {
                amount: coin.amount.clone(),
            })?;
        Ok(Balance {
            amount,
            denom: coin.denom.clone(),
        })
    }
}

/// Converts a list of coins, keeping their order.
pub fn balances(coins: &[Coin]) -> Result<Vec<Balance>, Error> {
    coins.iter().map(Balance::try_from).collect()
}

/// Metadata about a single LCD call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInfo {
    pub chain: String,
    pub url: String,
    pub duration: Duration,
    pub success: bool,
}

/// A decoded result together with the call that produced it.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub info: QueryInfo,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            info: self.info,
        }
    }
}

/// Responses that carry the gRPC-gateway status code in their body.
pub trait EmbeddedCode {
    fn code(&self) -> i64;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub next_key: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub total: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusPubkey {
    #[serde(rename = "@type", deserialize_with = "nullable")]
    pub type_url: String,
    #[serde(deserialize_with = "nullable")]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorDescription {
    #[serde(deserialize_with = "nullable")]
    pub moniker: String,
    #[serde(deserialize_with = "nullable")]
    pub identity: String,
    #[serde(deserialize_with = "nullable")]
    pub website: String,
    #[serde(deserialize_with = "nullable")]
    pub security_contact: String,
    #[serde(deserialize_with = "nullable")]
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionRates {
    #[serde(deserialize_with = "nullable")]
    pub rate: String,
    #[serde(deserialize_with = "nullable")]
    pub max_rate: String,
    #[serde(deserialize_with = "nullable")]
    pub max_change_rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorCommission {
    #[serde(deserialize_with = "nullable")]
    pub commission_rates: CommissionRates,
    #[serde(deserialize_with = "nullable")]
    pub update_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validator {
    #[serde(deserialize_with = "nullable")]
    pub operator_address: String,
    #[serde(deserialize_with = "nullable")]
    pub consensus_pubkey: ConsensusPubkey,
    #[serde(deserialize_with = "nullable")]
    pub jailed: bool,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub tokens: String,
    #[serde(deserialize_with = "nullable")]
    pub delegator_shares: String,
    #[serde(deserialize_with = "nullable")]
    pub description: ValidatorDescription,
    #[serde(deserialize_with = "nullable")]
    pub unbonding_height: String,
    #[serde(deserialize_with = "nullable")]
    pub unbonding_time: String,
    #[serde(deserialize_with = "nullable")]
    pub commission: ValidatorCommission,
    #[serde(deserialize_with = "nullable")]
    pub min_self_delegation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorResponse {
    #[serde(deserialize_with = "nullable")]
    pub code: i64,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub validator: Validator,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorsResponse {
    #[serde(deserialize_with = "nullable")]
    pub validators: Vec<Validator>,
    #[serde(deserialize_with = "nullable")]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationResponse {
    #[serde(deserialize_with = "nullable")]
    pub code: i64,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delegation {
    #[serde(deserialize_with = "nullable")]
    pub delegator_address: String,
    #[serde(deserialize_with = "nullable")]
    pub validator_address: String,
    #[serde(deserialize_with = "nullable")]
    pub shares: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationResponse {
    #[serde(deserialize_with = "nullable")]
    pub delegation: Delegation,
    #[serde(deserialize_with = "nullable")]
    pub balance: Coin,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleDelegationResponse {
    #[serde(deserialize_with = "nullable")]
    pub code: i64,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub delegation_response: DelegationResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionCoins {
    #[serde(deserialize_with = "nullable")]
    pub commission: Vec<Coin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionResponse {
    #[serde(deserialize_with = "nullable")]
    pub commission: CommissionCoins,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsResponse {
    #[serde(deserialize_with = "nullable")]
    pub rewards: Vec<Coin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancesResponse {
    #[serde(deserialize_with = "nullable")]
    pub balances: Vec<Coin>,
    #[serde(deserialize_with = "nullable")]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningInfo {
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub start_height: String,
    #[serde(deserialize_with = "nullable")]
    pub index_offset: String,
    #[serde(deserialize_with = "nullable")]
    pub jailed_until: String,
    #[serde(deserialize_with = "nullable")]
    pub tombstoned: bool,
    #[serde(deserialize_with = "nullable")]
    pub missed_blocks_counter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningInfoResponse {
    #[serde(deserialize_with = "nullable")]
    pub code: i64,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub val_signing_info: SigningInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashingParams {
    #[serde(deserialize_with = "nullable")]
    pub signed_blocks_window: String,
    #[serde(deserialize_with = "nullable")]
    pub min_signed_per_window: String,
    #[serde(deserialize_with = "nullable")]
    pub downtime_jail_duration: String,
    #[serde(deserialize_with = "nullable")]
    pub slash_fraction_double_sign: String,
    #[serde(deserialize_with = "nullable")]
    pub slash_fraction_downtime: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashingParamsResponse {
    #[serde(deserialize_with = "nullable")]
    pub params: SlashingParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingParams {
    #[serde(deserialize_with = "nullable")]
    pub unbonding_time: String,
    #[serde(deserialize_with = "nullable")]
    pub max_validators: u32,
    #[serde(deserialize_with = "nullable")]
    pub max_entries: u32,
    #[serde(deserialize_with = "nullable")]
    pub historical_entries: u32,
    #[serde(deserialize_with = "nullable")]
    pub bond_denom: String,
    #[serde(deserialize_with = "nullable")]
    pub min_commission_rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingParamsResponse {
    #[serde(deserialize_with = "nullable")]
    pub params: StakingParams,
}

macro_rules! embedded_code {
    ($($response:ty),+ $(,)?) => {
        $(
            impl EmbeddedCode for $response {
                fn code(&self) -> i64 {
                    self.code
                }
            }
        )+
    };
}

embedded_code!(
    ValidatorResponse,
    PaginationResponse,
    SingleDelegationResponse,
    SigningInfoResponse,
);
