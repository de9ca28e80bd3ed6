// services/tx/types.rs

use crate::config::ChainConfig;
use crate::errors::ChainError;
use ethers_core::types::{H256, U256};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TxOptions {
    pub gas_limit: u64,
    pub chain_id: u64,
    pub receipt_timeout: Duration,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            gas_limit: 300_000,
            chain_id: 1312,
            receipt_timeout: Duration::from_secs(120),
        }
    }
}

impl From<&ChainConfig> for TxOptions {
    fn from(config: &ChainConfig) -> Self {
        Self {
            gas_limit: config.gas_limit,
            chain_id: config.chain_id,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        }
    }
}

/// 一次 submit 的结果，每种失败都是独立的值
#[derive(Debug)]
pub enum MintOutcome {
    NotConnected,
    InvalidAddress(String),
    InvalidPrice(String),
    InsufficientBalance { required: U256, balance: U256 },
    SubmitFailed(ChainError),
    ConfirmationTimeout { tx_hash: H256 },
    TransactionReverted { tx_hash: H256 },
    Minted { quantity: u64, tx_hash: H256 },
    /// 余额/nonce/gas/签名/回执查询等未归类的失败
    Unexpected(ChainError),
}

impl MintOutcome {
    /// 预期内的稳态（校验不过、成功），按正常间隔继续轮询
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            MintOutcome::InvalidAddress(_)
                | MintOutcome::InvalidPrice(_)
                | MintOutcome::InsufficientBalance { .. }
                | MintOutcome::Minted { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MintOutcome::NotConnected => "not_connected",
            MintOutcome::InvalidAddress(_) => "invalid_address",
            MintOutcome::InvalidPrice(_) => "invalid_price",
            MintOutcome::InsufficientBalance { .. } => "insufficient_balance",
            MintOutcome::SubmitFailed(_) => "submit_failed",
            MintOutcome::ConfirmationTimeout { .. } => "confirmation_timeout",
            MintOutcome::TransactionReverted { .. } => "transaction_reverted",
            MintOutcome::Minted { .. } => "minted",
            MintOutcome::Unexpected(_) => "unexpected_error",
        }
    }
}

impl fmt::Display for MintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintOutcome::NotConnected => f.write_str("RPC 未连接"),
            MintOutcome::InvalidAddress(addr) => write!(f, "合约地址无效: {:?}", addr),
            MintOutcome::InvalidPrice(reason) => write!(f, "价格无效: {}", reason),
            MintOutcome::InsufficientBalance { required, balance } => {
                write!(f, "余额不足: 需要 {} wei, 当前 {} wei", required, balance)
            }
            MintOutcome::SubmitFailed(e) => write!(f, "广播失败: {}", e),
            MintOutcome::ConfirmationTimeout { tx_hash } => write!(f, "确认超时: {:?}", tx_hash),
            MintOutcome::TransactionReverted { tx_hash } => write!(f, "交易回滚: {:?}", tx_hash),
            MintOutcome::Minted { quantity, tx_hash } => {
                write!(f, "铸造成功 {} 个: {:?}", quantity, tx_hash)
            }
            MintOutcome::Unexpected(e) => write!(f, "未预期错误: {}", e),
        }
    }
}
