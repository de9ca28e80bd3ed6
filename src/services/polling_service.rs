use crate::config::MonitorConfig;
use crate::errors::FetchError;
use crate::infrastructure::fetcher::PageSource;
use crate::infrastructure::parser::MintDetailExtractor;
use crate::log_info;
use crate::services::mint_service::MintService;
use crate::services::tx::MintOutcome;
use bigdecimal::BigDecimal;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// 本轮结束后的等待策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Normal,
    Error,
}

/// 单轮汇总结果
#[derive(Debug)]
pub enum CycleOutcome {
    FetchFailed(FetchError),
    /// 页面里没有合约链接，本轮无事可做
    NoOpportunity,
    PriceUnknown { contract_address: String },
    PriceAboveLimit { price: BigDecimal, limit: BigDecimal },
    Mint(MintOutcome),
    Cancelled,
}

impl CycleOutcome {
    pub fn backoff(&self) -> Backoff {
        match self {
            CycleOutcome::NoOpportunity
            | CycleOutcome::PriceUnknown { .. }
            | CycleOutcome::PriceAboveLimit { .. }
            | CycleOutcome::Cancelled => Backoff::Normal,
            CycleOutcome::Mint(outcome) if outcome.is_expected() => Backoff::Normal,
            CycleOutcome::Mint(_) | CycleOutcome::FetchFailed(_) => Backoff::Error,
        }
    }

    /// 本轮停在哪个阶段
    pub fn stage(&self) -> &'static str {
        match self {
            CycleOutcome::FetchFailed(_) | CycleOutcome::Cancelled => "fetch",
            CycleOutcome::NoOpportunity
            | CycleOutcome::PriceUnknown { .. }
            | CycleOutcome::PriceAboveLimit { .. } => "extract",
            CycleOutcome::Mint(_) => "submit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::FetchFailed(_) => "fetch_error",
            CycleOutcome::NoOpportunity => "extraction_miss",
            CycleOutcome::PriceUnknown { .. } => "price_unknown",
            CycleOutcome::PriceAboveLimit { .. } => "price_above_limit",
            CycleOutcome::Mint(outcome) => outcome.label(),
            CycleOutcome::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::FetchFailed(e) => write!(f, "页面抓取失败: {}", e),
            CycleOutcome::NoOpportunity => f.write_str("未检测到合约地址"),
            CycleOutcome::PriceUnknown { contract_address } => {
                write!(f, "检测到合约 {} 但价格未知，跳过", contract_address)
            }
            CycleOutcome::PriceAboveLimit { price, limit } => {
                write!(f, "价格 {} 超过上限 {}，跳过", price, limit)
            }
            CycleOutcome::Mint(outcome) => fmt::Display::fmt(outcome, f),
            CycleOutcome::Cancelled => f.write_str("收到退出信号"),
        }
    }
}

/// 等到退出信号；发送端被丢弃则永远挂起（不再可能收到退出）
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// 轮询服务：抓取 -> 提取 -> 提交，单线程顺序执行，同一时刻至多一笔在途交易
pub struct PollingService {
    config: Arc<MonitorConfig>,
    page_source: Arc<dyn PageSource>,
    extractor: Arc<MintDetailExtractor>,
    mint_service: Arc<MintService>,
}

impl PollingService {
    pub fn new(
        config: Arc<MonitorConfig>,
        page_source: Arc<dyn PageSource>,
        extractor: Arc<MintDetailExtractor>,
        mint_service: Arc<MintService>,
    ) -> Self {
        Self {
            config,
            page_source,
            extractor,
            mint_service,
        }
    }

    pub fn interval_for(&self, backoff: Backoff) -> Duration {
        match backoff {
            Backoff::Normal => self.config.poll_interval(),
            Backoff::Error => self.config.error_backoff(),
        }
    }

    /// 跑一轮。退出信号只在抓取期间和阶段之间检查，交易一旦广播就等到结果
    pub async fn run_cycle(&self, shutdown: &mut watch::Receiver<bool>) -> CycleOutcome {
        let markup = tokio::select! {
            biased;
            _ = wait_for_shutdown(shutdown) => return CycleOutcome::Cancelled,
            fetched = self.page_source.fetch() => match fetched {
                Ok(markup) => markup,
                Err(e) => return CycleOutcome::FetchFailed(e),
            },
        };

        let Some(opportunity) = self.extractor.extract(Some(&markup)) else {
            return CycleOutcome::NoOpportunity;
        };
        log_info!(
            "检测: 价格 = {} {}, 合约 = {}",
            opportunity.price,
            self.config.currency_ticker,
            opportunity.contract_address
        );

        let Some(price) = opportunity.price.amount() else {
            return CycleOutcome::PriceUnknown {
                contract_address: opportunity.contract_address,
            };
        };
        if let Some(limit) = &self.config.max_price {
            if &price > limit {
                return CycleOutcome::PriceAboveLimit {
                    price,
                    limit: limit.clone(),
                };
            }
        }

        if *shutdown.borrow() {
            return CycleOutcome::Cancelled;
        }

        CycleOutcome::Mint(
            self.mint_service
                .submit(&opportunity.contract_address, &price, self.config.quantity)
                .await,
        )
    }

    /// 无限循环，直到收到退出信号
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut cycle: u64 = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }
            cycle += 1;

            let outcome = self.run_cycle(&mut shutdown).await;
            if matches!(outcome, CycleOutcome::Cancelled) {
                break;
            }
            report(cycle, &outcome);

            let delay = self.interval_for(outcome.backoff());
            tokio::select! {
                _ = sleep(delay) => {}
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }
        log_info!("轮询已停止, 共执行 {} 轮", cycle);
    }
}

fn report(cycle: u64, outcome: &CycleOutcome) {
    let stage = outcome.stage();
    let label = outcome.label();
    match (outcome.backoff(), outcome) {
        (Backoff::Error, _) => {
            tracing::error!(cycle, stage, outcome = label, "{}", outcome)
        }
        (Backoff::Normal, CycleOutcome::Mint(MintOutcome::Minted { .. })) => {
            tracing::info!(cycle, stage, outcome = label, "{}", outcome)
        }
        (Backoff::Normal, _) => tracing::warn!(cycle, stage, outcome = label, "{}", outcome),
    }
}
