use std::time::Duration;

use clap::Args;

pub const DEFAULT_USER_ADDRESS: &str = "0xb29601eB52a052042FB6c68C69a442BD0AE90082";
pub const DEFAULT_TAKER_ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Networks covered by the batch report. Chain ids come from the resolver.
pub const REPORT_NETWORKS: &[&str] = &["Base", "Arbitrum", "Optimism", "Mainnet"];

/// Whole-USD amounts quoted by the batch report.
pub const REPORT_AMOUNTS: &[f64] = &[1_000.0, 10_000.0, 100_000.0, 1_000_000.0];

/// Provider credentials and request parameters. Every field can come from the
/// environment (a `.env` file is honoured) or a command-line flag.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// 1inch developer portal key (bearer token)
    #[arg(long, env = "ONEINCH_API_KEY", hide_env_values = true)]
    pub oneinch_api_key: Option<String>,

    /// 0x API key
    #[arg(long, env = "ZERO_X_API_KEY", hide_env_values = true)]
    pub zero_x_api_key: Option<String>,

    /// LI.FI API key, optional
    #[arg(long, env = "LIFI_API_KEY", hide_env_values = true)]
    pub lifi_api_key: Option<String>,

    #[arg(long, env = "OKX_API_KEY", hide_env_values = true)]
    pub okx_api_key: Option<String>,

    #[arg(long, env = "OKX_SECRET_KEY", hide_env_values = true)]
    pub okx_secret_key: Option<String>,

    #[arg(long, env = "OKX_PASSPHRASE", hide_env_values = true)]
    pub okx_passphrase: Option<String>,

    /// Deadline for each provider call, in milliseconds
    #[arg(long, env = "QUOTE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Address quoted as the sender in provider requests
    #[arg(long, env = "QUOTE_USER_ADDRESS", default_value = DEFAULT_USER_ADDRESS)]
    pub user_address: String,

    /// Address quoted as the taker for 0x
    #[arg(long, env = "QUOTE_TAKER_ADDRESS", default_value = DEFAULT_TAKER_ADDRESS)]
    pub taker_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oneinch_api_key: None,
            zero_x_api_key: None,
            lifi_api_key: None,
            okx_api_key: None,
            okx_secret_key: None,
            okx_passphrase: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_address: DEFAULT_USER_ADDRESS.to_string(),
            taker_address: DEFAULT_TAKER_ADDRESS.to_string(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
