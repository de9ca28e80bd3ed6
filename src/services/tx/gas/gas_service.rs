// services/tx/gas/gas_service.rs

use crate::errors::ChainError;
use crate::infrastructure::provider::ChainClient;
use ethers_core::types::U256;

/// Gas price 计算服务（纯整数运算，无浮点风险）
#[derive(Clone, Copy, Debug)]
pub struct GasService {
    /// 对网络 gas price 的调整百分比（100 = 无调整，110 = +10%）
    multiplier_percent: u64,
}

impl Default for GasService {
    fn default() -> Self {
        Self::new(100)
    }
}

impl GasService {
    pub fn new(multiplier_percent: u64) -> Self {
        Self { multiplier_percent }
    }

    /// 网络价格 × 倍率，乘法先行再除以 100，避免截断误差
    pub fn apply_multiplier(&self, network_price: U256) -> Result<U256, ChainError> {
        network_price
            .checked_mul(U256::from(self.multiplier_percent))
            .map(|v| v / U256::from(100))
            .ok_or_else(|| ChainError::Overflow("gas price multiplier overflow".to_string()))
    }

    pub async fn resolve_gas_price(&self, chain: &dyn ChainClient) -> Result<U256, ChainError> {
        let network_price = chain.get_gas_price().await?;
        self.apply_multiplier(network_price)
    }
}
