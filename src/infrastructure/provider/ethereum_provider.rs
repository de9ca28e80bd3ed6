use crate::config::ChainConfig;
use crate::errors::{AppError, ChainError};
use crate::models::MintReceipt;
use crate::utils::is_valid_address;
use crate::log_debug;
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, H256, U256};
use ethers_providers::{Http, JsonRpcClient, Middleware, Provider};
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// 链上访问接口，每个调用独立失败、不做内部重试
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// 节点存活探测
    async fn is_connected(&self) -> bool;

    /// 语法校验（0x + 40位hex），不做 checksum 与合约存在性校验
    fn is_valid_address(&self, candidate: &str) -> bool {
        is_valid_address(candidate)
    }

    async fn get_chain_id(&self) -> Result<U256, ChainError>;
    async fn get_balance(&self, address: Address) -> Result<U256, ChainError>;
    async fn get_nonce(&self, address: Address) -> Result<U256, ChainError>;
    async fn get_gas_price(&self) -> Result<U256, ChainError>;
    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, ChainError>;
    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_after: Duration,
    ) -> Result<MintReceipt, ChainError>;
}

pub struct EthereumProvider<P = Http> {
    provider: Provider<P>,
    receipt_poll_interval: Duration,
}

impl EthereumProvider<Http> {
    pub fn new(config: &ChainConfig) -> Result<Self, AppError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", config.rpc_url, e)))?;

        Ok(Self::with_provider(
            provider,
            Duration::from_millis(config.receipt_poll_interval_ms),
        ))
    }
}

impl<P: JsonRpcClient> EthereumProvider<P> {
    pub fn with_provider(provider: Provider<P>, receipt_poll_interval: Duration) -> Self {
        Self {
            provider,
            receipt_poll_interval,
        }
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> ChainClient for EthereumProvider<P> {
    async fn is_connected(&self) -> bool {
        match self.provider.get_block_number().await {
            Ok(block) => {
                log_debug!("RPC 节点可用, 最新区块 {}", block);
                true
            }
            Err(e) => {
                log_debug!("RPC 存活探测失败: {}", e);
                false
            }
        }
    }

    async fn get_chain_id(&self) -> Result<U256, ChainError> {
        self.provider.get_chainid().await.map_err(ChainError::from)
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(ChainError::from)
    }

    async fn get_nonce(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_transaction_count(address, None)
            .await
            .map_err(ChainError::from)
    }

    async fn get_gas_price(&self) -> Result<U256, ChainError> {
        self.provider.get_gas_price().await.map_err(ChainError::from)
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, ChainError> {
        // 只广播，不等待确认；确认由 wait_for_receipt 单独负责
        let pending_tx = self
            .provider
            .send_raw_transaction(rlp)
            .await
            .map_err(|e| ChainError::Broadcast(e.to_string()))?;
        Ok(pending_tx.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_after: Duration,
    ) -> Result<MintReceipt, ChainError> {
        let poll = async {
            loop {
                if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                    return Ok::<_, ChainError>(MintReceipt::from_ethers(&receipt));
                }
                sleep(self.receipt_poll_interval).await;
            }
        };

        timeout(timeout_after, poll)
            .await
            .map_err(|_| ChainError::ReceiptTimeout {
                hash: tx_hash,
                timeout_secs: timeout_after.as_secs(),
            })?
    }
}
