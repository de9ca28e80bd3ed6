use ethers_core::types::H256;
use ethers_providers::ProviderError;
use thiserror::Error;

/// 启动阶段错误（配置、连接、链ID校验），出现即退出进程
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("无效的地址: {0}")]
    InvalidAddress(String),

    #[error("无效的私钥: {0}")]
    InvalidPrivateKey(String),

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("无效的价格: {0}")]
    InvalidPrice(String),

    #[error("无法连接到RPC节点: {0}")]
    NotConnected(String),

    #[error("链ID不匹配: 配置 {expected}, 节点 {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("区块链RPC错误: {0}")]
    Chain(#[from] ChainError),

    #[error("HTTP客户端初始化失败: {0}")]
    HttpClient(String),
}

/// 页面抓取失败：非2xx状态码、网络层错误、超时统一归为此类
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout(timeout_secs);
        }
        match err.status() {
            Some(status) => FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => FetchError::Transport(err.to_string()),
        }
    }
}

/// 链上调用错误，ChainClient 内部不做重试，由调用方决定
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    #[error("交易 {hash:?} 在 {timeout_secs}s 内未确认")]
    ReceiptTimeout { hash: H256, timeout_secs: u64 },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("数值溢出: {0}")]
    Overflow(String),
}

impl From<ProviderError> for ChainError {
    fn from(err: ProviderError) -> Self {
        ChainError::Transport(err.to_string())
    }
}
