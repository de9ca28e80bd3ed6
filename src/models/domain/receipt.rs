use ethers_core::types::{H256, U64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failure,
}

/// 交易回执中本服务关心的部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: H256,
    pub block_number: Option<U64>,
    pub status: ReceiptStatus,
}

impl MintReceipt {
    /// status 缺失（拜占庭前的节点）按失败处理
    pub fn from_ethers(receipt: &ethers_core::types::TransactionReceipt) -> Self {
        let status = match receipt.status {
            Some(s) if s == U64::from(1) => ReceiptStatus::Success,
            _ => ReceiptStatus::Failure,
        };
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status,
        }
    }
}
