use crate::errors::AppError;
use bigdecimal::BigDecimal;
use ethers_core::types::U256;

/// 原生币精度（18 位小数）
pub const NATIVE_DECIMALS: u32 = 18;
const WEI_PER_UNIT: u64 = 1_000_000_000_000_000_000;

/// 十进制金额 -> 最小单位（wei），定点精确换算，不经过浮点
///
/// 负数、或小数位超过 18 位（无法整除到 wei）都视为无效价格
pub fn decimal_to_wei(amount: &BigDecimal) -> Result<U256, AppError> {
    if amount < &BigDecimal::from(0) {
        return Err(AppError::InvalidPrice(format!("负数金额: {}", amount)));
    }

    let scaled = amount * BigDecimal::from(WEI_PER_UNIT);
    let truncated = scaled.with_scale(0);
    if truncated != scaled {
        return Err(AppError::InvalidPrice(format!(
            "金额 {} 超过 {} 位小数精度",
            amount, NATIVE_DECIMALS
        )));
    }

    let (digits, _) = truncated.into_bigint_and_exponent();
    U256::from_dec_str(&digits.to_string())
        .map_err(|e| AppError::InvalidPrice(format!("金额 {} 超出 U256 范围: {}", amount, e)))
}

/// price × quantity，转换为 wei
pub fn total_cost_wei(price: &BigDecimal, quantity: u64) -> Result<U256, AppError> {
    decimal_to_wei(&(price * BigDecimal::from(quantity)))
}
