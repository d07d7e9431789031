use std::sync::Arc;
use std::time::Duration;

use crate::controller::{PollPolicy, DEFAULT_POLL_INTERVAL};
use crate::transport::{HttpTransport, JobTransport, SimulatedTransport, SIMULATED_POLL_INTERVAL};

/// Default gateway origin the client calls.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway origin, without trailing slash.
    pub gateway_url: String,
    /// Run jobs against the local simulation instead of the gateway.
    pub mock_mode: bool,
    /// Delay between the end of one status fetch and the start of the next.
    pub poll_interval: Duration,
    /// Give up after this many status fetches. `None` polls until the job
    /// settles.
    pub max_poll_attempts: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            mock_mode: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                  |
    /// |---------------------|--------------------------|
    /// | `GATEWAY_URL`       | `http://127.0.0.1:3000`  |
    /// | `MOCK_MODE`         | off                      |
    /// | `POLL_INTERVAL_MS`  | `2000` (`400` in mock mode) |
    /// | `MAX_POLL_ATTEMPTS` | unbounded                |
    pub fn from_env() -> Self {
        let gateway_url = std::env::var("GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.into())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let mock_mode = nbt_core::settings::mock_mode_from_env();

        let default_interval = if mock_mode {
            SIMULATED_POLL_INTERVAL
        } else {
            DEFAULT_POLL_INTERVAL
        };
        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .map(|ms| {
                ms.parse()
                    .map(Duration::from_millis)
                    .expect("POLL_INTERVAL_MS must be a valid u64")
            })
            .unwrap_or(default_interval);

        let max_poll_attempts = std::env::var("MAX_POLL_ATTEMPTS").ok().map(|n| {
            n.parse::<u32>()
                .expect("MAX_POLL_ATTEMPTS must be a valid u32")
        });

        Self {
            gateway_url,
            mock_mode,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// The transport this configuration selects.
    pub fn transport(&self) -> Arc<dyn JobTransport> {
        if self.mock_mode {
            Arc::new(SimulatedTransport::new())
        } else {
            Arc::new(HttpTransport::new(self.gateway_url.clone()))
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }
}
