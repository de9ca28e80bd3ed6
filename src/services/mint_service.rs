// services/mint_service.rs
use crate::errors::ChainError;
use crate::infrastructure::provider::ChainClient;
use crate::models::ReceiptStatus;
use crate::services::tx::gas::GasService;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::{MintOutcome, TxOptions};
use crate::utils::{format_amount, total_cost_wei};
use crate::{log_info, log_warn};
use bigdecimal::BigDecimal;
use ethers_core::abi::{Token, encode};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, TransactionRequest, U256};
use ethers_core::utils::keccak256;
use std::sync::Arc;

const MINT_SIGNATURE: &str = "mint(uint256)";

/// 铸造提交服务：校验 -> 构建 -> 签名 -> 广播 -> 等待回执
///
/// 每次 submit 至多广播一笔交易，失败不在内部重发（重发需要重新取 nonce/gas，交给下一轮）
pub struct MintService {
    pub chain: Arc<dyn ChainClient>,
    pub signer: Arc<dyn TxSigner>,
    pub gas_svc: GasService,
    pub options: TxOptions,
    /// 仅用于日志展示金额
    pub ticker: String,
}

/// `mint(uint256 quantity)` 的 calldata：4 字节选择器 + 32 字节参数
pub fn encode_mint_call(quantity: u64) -> Bytes {
    let selector = &keccak256(MINT_SIGNATURE)[..4];
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(selector);
    data.extend_from_slice(&encode(&[Token::Uint(U256::from(quantity))]));
    data.into()
}

/// 构建 legacy 交易（带 EIP-155 chain_id）
pub fn build_mint_transaction(
    from: Address,
    contract: Address,
    value: U256,
    nonce: U256,
    gas_price: U256,
    quantity: u64,
    options: &TxOptions,
) -> TransactionRequest {
    TransactionRequest::new()
        .from(from)
        .to(contract)
        .value(value)
        .nonce(nonce)
        .gas(options.gas_limit)
        .gas_price(gas_price)
        .chain_id(options.chain_id)
        .data(encode_mint_call(quantity))
}

impl MintService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        signer: Arc<dyn TxSigner>,
        gas_svc: GasService,
        options: TxOptions,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            chain,
            signer,
            gas_svc,
            options,
            ticker: ticker.into(),
        }
    }

    pub async fn submit(
        &self,
        contract_address: &str,
        price: &BigDecimal,
        quantity: u64,
    ) -> MintOutcome {
        // 1. 连接检查
        if !self.chain.is_connected().await {
            log_warn!("RPC 节点未连接，跳过铸造");
            return MintOutcome::NotConnected;
        }

        // 2. 合约地址校验
        let contract = match self.parse_contract(contract_address) {
            Some(addr) => addr,
            None => {
                log_warn!("合约地址无效: {:?}", contract_address);
                return MintOutcome::InvalidAddress(contract_address.to_string());
            }
        };

        // 3. 定点换算总价
        let total_cost = match total_cost_wei(price, quantity) {
            Ok(v) => v,
            Err(e) => return MintOutcome::InvalidPrice(e.to_string()),
        };

        // 4. 余额检查
        let wallet = self.signer.address();
        let balance = match self.chain.get_balance(wallet).await {
            Ok(b) => b,
            Err(e) => return MintOutcome::Unexpected(e),
        };
        if balance < total_cost {
            log_warn!(
                "余额不足! 需要: {}, 当前: {}",
                format_amount(total_cost, &self.ticker),
                format_amount(balance, &self.ticker)
            );
            return MintOutcome::InsufficientBalance {
                required: total_cost,
                balance,
            };
        }

        // 5. 构建交易
        let (nonce, gas_price) = match self.resolve_nonce_and_gas(wallet).await {
            Ok(v) => v,
            Err(e) => return MintOutcome::Unexpected(e),
        };
        let typed_tx: TypedTransaction = build_mint_transaction(
            wallet,
            contract,
            total_cost,
            nonce,
            gas_price,
            quantity,
            &self.options,
        )
        .into();

        // 6. 本地签名
        let signature = match self.signer.sign_tx(&typed_tx).await {
            Ok(sig) => sig,
            Err(e) => return MintOutcome::Unexpected(e),
        };
        let signed_rlp = typed_tx.rlp_signed(&signature);

        // 7. 广播（只发一次）
        let tx_hash = match self.chain.send_raw_transaction(signed_rlp).await {
            Ok(hash) => hash,
            Err(e) => return MintOutcome::SubmitFailed(e),
        };
        log_info!(
            "Minting... hash={:?} nonce={} gas_price={} value={}",
            tx_hash,
            nonce,
            gas_price,
            format_amount(total_cost, &self.ticker)
        );

        // 8. 等待回执
        match self
            .chain
            .wait_for_receipt(tx_hash, self.options.receipt_timeout)
            .await
        {
            Ok(receipt) if receipt.status == ReceiptStatus::Success => {
                log_info!(
                    "NFT 铸造成功 ({} 个): hash={:?}, block={:?}",
                    quantity,
                    receipt.tx_hash,
                    receipt.block_number
                );
                MintOutcome::Minted { quantity, tx_hash }
            }
            Ok(_) => MintOutcome::TransactionReverted { tx_hash },
            Err(ChainError::ReceiptTimeout { .. }) => MintOutcome::ConfirmationTimeout { tx_hash },
            Err(e) => MintOutcome::Unexpected(e),
        }
    }

    fn parse_contract(&self, candidate: &str) -> Option<Address> {
        if candidate.trim().is_empty() || !self.chain.is_valid_address(candidate) {
            return None;
        }
        candidate.parse::<Address>().ok()
    }

    async fn resolve_nonce_and_gas(&self, wallet: Address) -> Result<(U256, U256), ChainError> {
        let nonce = self.chain.get_nonce(wallet).await?;
        let gas_price = self.gas_svc.resolve_gas_price(&*self.chain).await?;
        Ok((nonce, gas_price))
    }
}
