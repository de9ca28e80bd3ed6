use crate::config::secret::SecretString;
use crate::errors::AppError;
use crate::utils::is_valid_address;
use bigdecimal::BigDecimal;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const ENV_PREFIX: &str = "MINT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub chain: ChainConfig,
    pub wallet: WalletConfig,
    pub monitor: MonitorConfig,
}

/// RPC 与交易参数
#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// gas price 倍率（百分比整数，110 = 网络价格 × 1.1）
    #[serde(default = "default_gas_price_multiplier_percent")]
    pub gas_price_multiplier_percent: u64,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    pub address: String,
    pub private_key: SecretString,
}

/// 页面监控与轮询节奏
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub page_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,
    #[serde(default = "default_quantity")]
    pub quantity: u64,
    #[serde(default = "default_currency_ticker")]
    pub currency_ticker: String,
    /// 区块浏览器地址链接的正则片段，后面紧跟 0x + 40位hex
    #[serde(default = "default_explorer_pattern")]
    pub explorer_pattern: String,
    /// 价格上限，超过则跳过本轮
    #[serde(default)]
    pub max_price: Option<BigDecimal>,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

fn default_chain_id() -> u64 {
    1312
}
fn default_gas_limit() -> u64 {
    300_000
}
fn default_gas_price_multiplier_percent() -> u64 {
    110
}
fn default_receipt_timeout_secs() -> u64 {
    120
}
fn default_receipt_poll_interval_ms() -> u64 {
    1_000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_poll_interval_secs() -> u64 {
    60
}
fn default_error_backoff_secs() -> u64 {
    300
}
fn default_quantity() -> u64 {
    1
}
fn default_currency_ticker() -> String {
    "MON".to_string()
}
fn default_explorer_pattern() -> String {
    r"monad\.xyz/explorer/address/".to_string()
}

impl Config {
    /// 加载顺序：config/default -> config/{APP_ENVIRONMENT} -> MINT_* 环境变量
    /// 例：MINT_WALLET__PRIVATE_KEY 覆盖 wallet.private_key
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// 启动前的静态校验，任何一项失败都直接退出
    pub fn validate(&self) -> Result<(), AppError> {
        Url::parse(&self.chain.rpc_url)
            .map_err(|e| AppError::InvalidUrl(format!("chain.rpc_url: {}", e)))?;
        Url::parse(&self.monitor.page_url)
            .map_err(|e| AppError::InvalidUrl(format!("monitor.page_url: {}", e)))?;

        if !is_valid_address(&self.wallet.address) {
            return Err(AppError::InvalidAddress(self.wallet.address.clone()));
        }
        if self.wallet.private_key.is_empty() {
            return Err(AppError::InvalidPrivateKey("wallet.private_key 为空".into()));
        }
        if !(100..=120).contains(&self.chain.gas_price_multiplier_percent) {
            return Err(AppError::Validation(format!(
                "gas_price_multiplier_percent 必须在 100..=120 之间, 当前 {}",
                self.chain.gas_price_multiplier_percent
            )));
        }
        if self.chain.gas_limit == 0 {
            return Err(AppError::Validation("gas_limit 不能为 0".into()));
        }
        if self.monitor.quantity == 0 {
            return Err(AppError::Validation("quantity 至少为 1".into()));
        }
        if self.monitor.currency_ticker.trim().is_empty() {
            return Err(AppError::Validation("currency_ticker 不能为空".into()));
        }
        if let Some(max_price) = &self.monitor.max_price {
            if max_price < &BigDecimal::from(0) {
                return Err(AppError::InvalidPrice(format!("max_price 为负数: {}", max_price)));
            }
        }
        Ok(())
    }
}
