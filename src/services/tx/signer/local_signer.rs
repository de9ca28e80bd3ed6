// services/tx/signer/local_signer.rs

use crate::config::SecretString;
use crate::errors::{AppError, ChainError};
use crate::services::tx::signer::TxSigner;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{H160, Signature};
use ethers_signers::{LocalWallet, Signer};
use std::sync::Arc;

#[derive(Clone)]
pub struct LocalSigner {
    wallet: Arc<LocalWallet>,
}

impl LocalSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self {
            wallet: Arc::new(wallet),
        }
    }

    /// 从私钥构建签名器并绑定 chain_id（EIP-155）
    ///
    /// 错误信息里不包含私钥本身
    pub fn from_private_key(key: &SecretString, chain_id: u64) -> Result<Self, AppError> {
        let wallet = key
            .expose_secret()
            .trim()
            .parse::<LocalWallet>()
            .map_err(|_| AppError::InvalidPrivateKey("私钥格式错误（需要 32 字节 hex）".into()))?
            .with_chain_id(chain_id);
        Ok(Self::new(wallet))
    }
}

#[async_trait::async_trait]
impl TxSigner for LocalSigner {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, ChainError> {
        self.wallet
            .sign_transaction(tx)
            .await
            .map_err(|e| ChainError::Signing(e.to_string()))
    }

    fn address(&self) -> H160 {
        self.wallet.address()
    }

    fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // anvil/hardhat 默认测试账户 #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn derives_address_and_binds_chain_id() {
        let signer = LocalSigner::from_private_key(&SecretString::new(TEST_KEY.into()), 1312).unwrap();
        assert_eq!(signer.address(), TEST_ADDR.parse::<H160>().unwrap());
        assert_eq!(signer.chain_id(), 1312);
    }

    #[test]
    fn malformed_key_error_does_not_echo_the_key() {
        let bad = "0xnot-a-key-but-secret";
        let err = LocalSigner::from_private_key(&SecretString::new(bad.into()), 1)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidPrivateKey(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
