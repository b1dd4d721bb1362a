#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use validator_lcd_monitor::config::QueryToggles;
use validator_lcd_monitor::http::Transport;
use validator_lcd_monitor::{ChainConfig, Error, Lcd};

pub const LCD_ENDPOINT: &str = "https://lcd.test";

/// Serves one canned body for every request and remembers the URLs asked for.
pub struct FixtureTransport {
    body: &'static str,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    pub fn new(body: &'static str) -> Self {
        FixtureTransport {
            body,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FixtureTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.body.as_bytes().to_vec())
    }
}

pub fn chain(queries: QueryToggles) -> ChainConfig {
    let mut chain = ChainConfig::new("cosmos", LCD_ENDPOINT);
    chain.queries = queries;
    chain
}

pub fn lcd(transport: &FixtureTransport) -> Lcd<&FixtureTransport> {
    Lcd::with_transport(chain(QueryToggles::default()), transport, Duration::from_secs(5))
}
