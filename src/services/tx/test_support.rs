//! 测试用的链/页面/签名替身，记录广播次数以验证“不该发交易时绝不发”

use crate::config::SecretString;
use crate::errors::{ChainError, FetchError};
use crate::infrastructure::fetcher::PageSource;
use crate::infrastructure::provider::ChainClient;
use crate::models::{MintReceipt, ReceiptStatus};
use crate::services::tx::signer::LocalSigner;
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, H256, U256, U64};
use ethers_core::utils::keccak256;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub(crate) const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub(crate) const CHAIN_ID: u64 = 1312;

/// 以 0.1 MON 为单位的 wei 数，mon(4) = 0.4 MON
pub(crate) fn mon(tenths: u64) -> U256 {
    U256::from(tenths) * U256::from(100_000_000_000_000_000u64)
}

pub(crate) fn test_signer() -> LocalSigner {
    LocalSigner::from_private_key(&SecretString::new(TEST_KEY.into()), CHAIN_ID).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReceiptBehavior {
    Success,
    Reverted,
    Timeout,
}

pub(crate) struct FakeChain {
    pub connected: bool,
    pub chain_id: u64,
    pub balance: U256,
    pub nonce: U256,
    pub gas_price: U256,
    pub receipt: ReceiptBehavior,
    pub broadcast_fails: bool,
    pub broadcasts: Mutex<Vec<Bytes>>,
    pub connectivity_checks: AtomicUsize,
    pub receipt_waits: AtomicUsize,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            connected: true,
            chain_id: CHAIN_ID,
            balance: U256::zero(),
            nonce: U256::from(7),
            gas_price: U256::from(50_000_000_000u64),
            receipt: ReceiptBehavior::Success,
            broadcast_fails: false,
            broadcasts: Mutex::new(Vec::new()),
            connectivity_checks: AtomicUsize::new(0),
            receipt_waits: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_receipt(mut self, receipt: ReceiptBehavior) -> Self {
        self.receipt = receipt;
        self
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }

    pub fn last_broadcast(&self) -> Option<Bytes> {
        self.broadcasts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn is_connected(&self) -> bool {
        self.connectivity_checks.fetch_add(1, Ordering::SeqCst);
        self.connected
    }

    async fn get_chain_id(&self) -> Result<U256, ChainError> {
        Ok(U256::from(self.chain_id))
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, ChainError> {
        Ok(self.balance)
    }

    async fn get_nonce(&self, _address: Address) -> Result<U256, ChainError> {
        Ok(self.nonce)
    }

    async fn get_gas_price(&self) -> Result<U256, ChainError> {
        Ok(self.gas_price)
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, ChainError> {
        if self.broadcast_fails {
            return Err(ChainError::Broadcast("nonce too low".into()));
        }
        let hash = H256::from(keccak256(&rlp));
        self.broadcasts.lock().unwrap().push(rlp);
        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout_after: Duration,
    ) -> Result<MintReceipt, ChainError> {
        self.receipt_waits.fetch_add(1, Ordering::SeqCst);
        let status = match self.receipt {
            ReceiptBehavior::Success => ReceiptStatus::Success,
            ReceiptBehavior::Reverted => ReceiptStatus::Failure,
            ReceiptBehavior::Timeout => {
                return Err(ChainError::ReceiptTimeout {
                    hash: tx_hash,
                    timeout_secs: timeout_after.as_secs(),
                });
            }
        };
        Ok(MintReceipt {
            tx_hash,
            block_number: Some(U64::from(100)),
            status,
        })
    }
}

pub(crate) enum PageBehavior {
    Markup(String),
    Timeout,
}

pub(crate) struct FakePage {
    pub behavior: PageBehavior,
    pub fetches: AtomicUsize,
}

impl FakePage {
    pub fn markup(markup: impl Into<String>) -> Self {
        Self {
            behavior: PageBehavior::Markup(markup.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            behavior: PageBehavior::Timeout,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakePage {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            PageBehavior::Markup(m) => Ok(m.clone()),
            PageBehavior::Timeout => Err(FetchError::Timeout(10)),
        }
    }
}

/// Magic Eden 风格的最小页面
pub(crate) fn mint_page(price_text: &str, contract: &str) -> String {
    format!(
        r#"<html><body><div class="price"><span>Price</span><span>{}</span></div>
<a href="https://testnet.monad.xyz/explorer/address/{}" target="_blank">Contract</a></body></html>"#,
        price_text, contract
    )
}
