use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::infrastructure::fetcher::{HttpPageFetcher, PageSource};
use crate::infrastructure::parser::MintDetailExtractor;
use crate::infrastructure::provider::{ChainClient, EthereumProvider};
use crate::services::tx::gas::GasService;
use crate::services::tx::signer::{LocalSigner, TxSigner};
use crate::services::tx::TxOptions;
use crate::services::{MintService, PollingService};
use crate::utils::format_amount;
use crate::{log_error, log_info, log_warn};
use ethers_core::types::{Address, U256};

/// 应用程序启动与管理结构体（仅后台轮询，无HTTP API）
pub struct Application {
    pub polling_service: Arc<PollingService>,
}
pub type Result<T> = std::result::Result<T, AppError>;

/// 启动前检查：节点可达、链ID一致。任何一项失败进程都不进入主循环
pub async fn verify_chain(chain: &dyn ChainClient, expected_chain_id: u64) -> Result<()> {
    if !chain.is_connected().await {
        return Err(AppError::NotConnected("RPC 节点不可达".into()));
    }
    let actual = chain.get_chain_id().await?;
    if actual != U256::from(expected_chain_id) {
        return Err(AppError::ChainIdMismatch {
            expected: expected_chain_id,
            actual: actual.low_u64(),
        });
    }
    Ok(())
}

/// 私钥推导出的地址必须与配置的钱包地址一致
pub fn verify_wallet(signer: &dyn TxSigner, configured: &str) -> Result<Address> {
    let configured_addr = configured
        .parse::<Address>()
        .map_err(|_| AppError::InvalidAddress(configured.to_string()))?;
    if signer.address() != configured_addr {
        return Err(AppError::Validation(format!(
            "私钥对应地址 {:?} 与配置钱包 {} 不一致",
            signer.address(),
            configured
        )));
    }
    Ok(configured_addr)
}

/// 收到退出信号后通知轮询循环；信号监听安装失败时只记录日志，循环照常运行
async fn forward_shutdown<F>(signal: F, shutdown_tx: watch::Sender<bool>)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            log_info!("⚠️  Received shutdown signal, exiting...");
            let _ = shutdown_tx.send(true);
        }
        Err(e) => {
            log_error!("监听 Ctrl+C 失败，无法优雅退出: {}", e);
            // sender 不能 drop，否则接收端会被视为关闭
            std::future::pending::<()>().await;
        }
    }
}

impl Application {
    /// 构建应用实例：校验配置、连接节点、加载签名器（不启动轮询）
    pub async fn build(config: Config) -> Result<Self> {
        config.validate()?;

        let chain = Arc::new(EthereumProvider::new(&config.chain)?) as Arc<dyn ChainClient>;
        verify_chain(&*chain, config.chain.chain_id).await?;
        info!("已连接 RPC, chain_id={}", config.chain.chain_id);

        let signer = Arc::new(LocalSigner::from_private_key(
            &config.wallet.private_key,
            config.chain.chain_id,
        )?) as Arc<dyn TxSigner>;
        let wallet = verify_wallet(&*signer, &config.wallet.address)?;

        match chain.get_balance(wallet).await {
            Ok(balance) => log_info!(
                "钱包 {:?} 余额: {}",
                wallet,
                format_amount(balance, &config.monitor.currency_ticker)
            ),
            Err(e) => log_warn!("启动时查询余额失败: {}", e),
        }

        let page_source =
            Arc::new(HttpPageFetcher::new(&config.monitor)?) as Arc<dyn PageSource>;
        let extractor = Arc::new(MintDetailExtractor::new(
            &config.monitor.currency_ticker,
            &config.monitor.explorer_pattern,
        )?);
        let mint_service = Arc::new(MintService::new(
            chain,
            signer,
            GasService::new(config.chain.gas_price_multiplier_percent),
            TxOptions::from(&config.chain),
            config.monitor.currency_ticker.clone(),
        ));

        let polling_service = Arc::new(PollingService::new(
            Arc::new(config.monitor),
            page_source,
            extractor,
            mint_service,
        ));
        Ok(Self { polling_service })
    }

    /// 启动轮询主循环，Ctrl+C 后在阶段边界退出
    pub async fn run(self) -> anyhow::Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(forward_shutdown(tokio::signal::ctrl_c(), shutdown_tx));

        log_info!("✔️ Mint polling started");
        self.polling_service.run(shutdown_rx).await;
        Ok(())
    }
}
