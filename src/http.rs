use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, QueryError};
use crate::types::{Fetched, QueryInfo};

const USER_AGENT: &str = concat!("lcd-monitor/", env!("CARGO_PKG_VERSION"));

/// Raw GET primitive. Returns the response body whatever the HTTP status is,
/// LCD error bodies carry their own code.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        (**self).fetch(url)
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self.client.get(url).send()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// GET + JSON decode, timing every call into a [`QueryInfo`].
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    chain: String,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, chain: impl Into<String>) -> Self {
        Client {
            transport,
            chain: chain.into(),
        }
    }

    pub fn get<R: DeserializeOwned>(&self, url: &str) -> Result<Fetched<R>, QueryError> {
        debug!(chain = %self.chain, url, "doing a query");
        let start = Instant::now();

        let result = self
            .transport
            .fetch(url)
            .and_then(|body| serde_json::from_slice::<R>(&body).map_err(Error::from));

        let mut info = QueryInfo {
            chain: self.chain.clone(),
            url: url.to_string(),
            duration: start.elapsed(),
            success: false,
        };

        match result {
            Ok(value) => {
                info.success = true;
                debug!(chain = %self.chain, url, duration = ?info.duration, "query is finished");
                Ok(Fetched { value, info })
            }
            Err(source) => {
                warn!(chain = %self.chain, url, error = %source, "query failed");
                Err(QueryError { info, source })
            }
        }
    }
}
