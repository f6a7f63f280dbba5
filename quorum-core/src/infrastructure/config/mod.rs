use crate::foundation::{QuorumError, Result};
use serde::{Deserialize, Serialize};

/// Base configuration for the application.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ledger node endpoint.
    #[serde(default)]
    pub node_rpc_url: String,
    /// Expected chain id. When unset, the chain id reported by the node is
    /// trusted as-is.
    #[serde(default)]
    pub chain_id: Option<u8>,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub transaction: TransactionDefaults,
}

/// Submission and confirmation-polling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Attempts for the initial submit call (transient failures only).
    #[serde(default = "default_submit_attempts")]
    pub submit_attempts: usize,
    #[serde(default = "default_retry_delay_millis")]
    pub retry_delay_millis: u64,
    /// Interval between confirmation polls.
    #[serde(default = "default_poll_interval_millis")]
    pub poll_interval_millis: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

/// Defaults applied when assembling a transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionDefaults {
    #[serde(default = "default_max_gas")]
    pub max_gas: u64,
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,
    /// Transactions expire this many seconds after assembly; the encoded
    /// expiration is always absolute.
    #[serde(default = "default_expiration_ttl_secs")]
    pub expiration_ttl_secs: u64,
}

fn default_submit_attempts() -> usize {
    3
}

fn default_retry_delay_millis() -> u64 {
    500
}

fn default_poll_interval_millis() -> u64 {
    250
}

fn default_confirmation_timeout_secs() -> u64 {
    30
}

fn default_max_gas() -> u64 {
    2_000
}

fn default_gas_price() -> u64 {
    100
}

fn default_expiration_ttl_secs() -> u64 {
    600
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            submit_attempts: default_submit_attempts(),
            retry_delay_millis: default_retry_delay_millis(),
            poll_interval_millis: default_poll_interval_millis(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
        }
    }
}

impl Default for TransactionDefaults {
    fn default() -> Self {
        Self {
            max_gas: default_max_gas(),
            gas_price: default_gas_price(),
            expiration_ttl_secs: default_expiration_ttl_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { node_rpc_url: String::new(), chain_id: None, submission: SubmissionConfig::default(), transaction: TransactionDefaults::default() }
    }
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(raw).map_err(|err| QuorumError::ConfigError(err.to_string()))?;
        config.validate().map_err(|errors| QuorumError::ConfigError(errors.join("; ")))?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.submission.submit_attempts == 0 {
            errors.push("submission.submit_attempts must be > 0".to_string());
        }
        if self.submission.poll_interval_millis == 0 {
            errors.push("submission.poll_interval_millis must be > 0".to_string());
        }
        if self.submission.confirmation_timeout_secs == 0 {
            errors.push("submission.confirmation_timeout_secs must be > 0".to_string());
        }
        if self.transaction.max_gas == 0 {
            errors.push("transaction.max_gas must be > 0".to_string());
        }
        if self.transaction.expiration_ttl_secs == 0 {
            errors.push("transaction.expiration_ttl_secs must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
