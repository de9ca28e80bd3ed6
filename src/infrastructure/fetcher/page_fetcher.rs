use crate::config::MonitorConfig;
use crate::errors::{AppError, FetchError};
use crate::log_debug;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 页面来源：每轮一次 GET，失败统一返回 FetchError，不在内部重试
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

pub struct HttpPageFetcher {
    client: Client,
    url: Url,
    timeout_secs: u64,
}

impl HttpPageFetcher {
    pub fn new(config: &MonitorConfig) -> Result<Self, AppError> {
        let url = Url::parse(&config.page_url)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", config.page_url, e)))?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url,
            timeout_secs: config.fetch_timeout_secs,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_secs))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_secs))?;

        log_debug!("页面抓取成功: {} ({} bytes)", self.url, body.len());
        Ok(body)
    }
}
