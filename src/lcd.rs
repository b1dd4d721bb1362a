//! One-shot queries against a Cosmos SDK LCD endpoint.
//!
//! Every query is gated by a [`Query`] switch in the chain config. A disabled
//! query returns `Ok(None)` without touching the network. A failed query
//! returns a [`QueryError`] that still carries the call's [`QueryInfo`].
//!
//! Only the validator, delegation/unbond counts, self-delegation and signing
//! info responses have their embedded `code` checked. The other endpoints
//! are returned as decoded.
//!
//! [`QueryInfo`]: crate::types::QueryInfo
use std::time::Duration;

use tracing::trace;

use crate::config::{ChainConfig, Query};
use crate::error::{Error, QueryError};
use crate::http::{Client, ReqwestTransport, Transport};
use crate::types::{
    balances, Balance, BalancesResponse, CommissionResponse, EmbeddedCode, Fetched,
    PaginationResponse, RewardsResponse, SigningInfoResponse, SingleDelegationResponse,
    SlashingParamsResponse, StakingParamsResponse, ValidatorResponse, ValidatorsResponse,
};

/// `Ok(None)` when the query is disabled for the chain.
pub type QueryResult<T> = Result<Option<Fetched<T>>, QueryError>;

pub struct Lcd<T = ReqwestTransport> {
    chain: ChainConfig,
    client: Client<T>,
    timeout: Duration,
}

impl Lcd<ReqwestTransport> {
    pub fn new(chain: ChainConfig, timeout: Duration) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Lcd::with_transport(chain, transport, timeout))
    }
}

impl<T: Transport> Lcd<T> {
    pub fn with_transport(chain: ChainConfig, transport: T, timeout: Duration) -> Self {
        let client = Client::new(transport, chain.name.clone());
        Lcd {
            chain,
            client,
            timeout,
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn enabled(&self, query: Query) -> bool {
        let enabled = self.chain.query_enabled(query);
        if !enabled {
            trace!(chain = %self.chain.name, %query, "query is disabled, skipping");
        }
        enabled
    }

    pub fn get_validator(&self, address: &str) -> QueryResult<ValidatorResponse> {
        if !self.enabled(Query::Validator) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/staking/v1beta1/validators/{}",
            self.chain.lcd_endpoint, address
        );

        self.client.get(&url).and_then(check_code).map(Some)
    }

    pub fn get_delegations_count(&self, address: &str) -> QueryResult<PaginationResponse> {
        if !self.enabled(Query::Delegations) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/staking/v1beta1/validators/{}/delegations?pagination.count_total=true&pagination.limit=1",
            self.chain.lcd_endpoint, address
        );

        self.client.get(&url).and_then(check_code).map(Some)
    }

    pub fn get_unbonds_count(&self, address: &str) -> QueryResult<PaginationResponse> {
        if !self.enabled(Query::Unbonds) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/staking/v1beta1/validators/{}/unbonding_delegations?pagination.count_total=true&pagination.limit=1",
            self.chain.lcd_endpoint, address
        );

        self.client.get(&url).and_then(check_code).map(Some)
    }

    pub fn get_single_delegation(&self, validator: &str, wallet: &str) -> QueryResult<Balance> {
        if !self.enabled(Query::SelfDelegation) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/staking/v1beta1/validators/{}/delegations/{}",
            self.chain.lcd_endpoint, validator, wallet
        );

        let fetched = self
            .client
            .get::<SingleDelegationResponse>(&url)
            .and_then(check_code)?;
        convert(fetched, |response| {
            Balance::try_from(&response.delegation_response.balance)
        })
        .map(Some)
    }

    pub fn get_all_validators(&self) -> QueryResult<ValidatorsResponse> {
        if !self.enabled(Query::Validators) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/staking/v1beta1/validators?pagination.count_total=true&pagination.limit=1000",
            self.chain.lcd_endpoint
        );

        self.client.get(&url).map(Some)
    }

    pub fn get_validator_commission(&self, address: &str) -> QueryResult<Vec<Balance>> {
        if !self.enabled(Query::Commission) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/distribution/v1beta1/validators/{}/commission",
            self.chain.lcd_endpoint, address
        );

        let fetched = self.client.get::<CommissionResponse>(&url)?;
        convert(fetched, |response| balances(&response.commission.commission)).map(Some)
    }

    pub fn get_delegator_rewards(&self, validator: &str, wallet: &str) -> QueryResult<Vec<Balance>> {
        if !self.enabled(Query::Rewards) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/distribution/v1beta1/delegators/{}/rewards/{}",
            self.chain.lcd_endpoint, wallet, validator
        );

        let fetched = self.client.get::<RewardsResponse>(&url)?;
        convert(fetched, |response| balances(&response.rewards)).map(Some)
    }

    pub fn get_wallet_balance(&self, wallet: &str) -> QueryResult<Vec<Balance>> {
        if !self.enabled(Query::Balance) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}",
            self.chain.lcd_endpoint, wallet
        );

        let fetched = self.client.get::<BalancesResponse>(&url)?;
        convert(fetched, |response| balances(&response.balances)).map(Some)
    }

    pub fn get_signing_info(&self, valcons: &str) -> QueryResult<SigningInfoResponse> {
        if !self.enabled(Query::SigningInfo) {
            return Ok(None);
        }

        let url = format!(
            "{}/cosmos/slashing/v1beta1/signing_infos/{}",
            self.chain.lcd_endpoint, valcons
        );

        self.client.get(&url).and_then(check_code).map(Some)
    }

    pub fn get_slashing_params(&self) -> QueryResult<SlashingParamsResponse> {
        if !self.enabled(Query::SlashingParams) {
            return Ok(None);
        }

        let url = format!("{}/cosmos/slashing/v1beta1/params", self.chain.lcd_endpoint);

        self.client.get(&url).map(Some)
    }

    pub fn get_staking_params(&self) -> QueryResult<StakingParamsResponse> {
        if !self.enabled(Query::StakingParams) {
            return Ok(None);
        }

        let url = format!("{}/cosmos/staking/v1beta1/params", self.chain.lcd_endpoint);

        self.client.get(&url).map(Some)
    }
}

fn check_code<R: EmbeddedCode>(fetched: Fetched<R>) -> Result<Fetched<R>, QueryError> {
    match fetched.value.code() {
        0 => Ok(fetched),
        code => Err(QueryError {
            info: fetched.info,
            source: Error::UnexpectedCode { code },
        }),
    }
}

fn convert<R, U>(
    fetched: Fetched<R>,
    f: impl FnOnce(&R) -> Result<U, Error>,
) -> Result<Fetched<U>, QueryError> {
    let converted = f(&fetched.value);
    match converted {
        Ok(value) => Ok(fetched.map(|_| value)),
        Err(source) => Err(QueryError {
            info: fetched.info,
            source,
        }),
    }
}
