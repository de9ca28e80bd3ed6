use crate::errors::ChainError;
use async_trait::async_trait;
use ethers::types::{transaction::eip2718::TypedTransaction, Signature, H160};

/// 本地签名接口，私钥不离开进程
#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, ChainError>;
    fn address(&self) -> H160;
    fn chain_id(&self) -> u64;
}
