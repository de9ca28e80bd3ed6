pub mod config;
pub mod secret;

pub use self::config::{ChainConfig, Config, MonitorConfig};
pub use secret::SecretString;
