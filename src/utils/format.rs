use crate::utils::convert::NATIVE_DECIMALS;
use bigdecimal::BigDecimal;
use ethers_core::types::U256;
use ethers_core::utils::format_units;
use std::str::FromStr;

/// wei -> 原生币单位，例如 400000000000000000 -> 0.4
pub fn wei_to_decimal(wei: U256) -> BigDecimal {
    format_units(wei, NATIVE_DECIMALS)
        .ok()
        .and_then(|units| BigDecimal::from_str(&units).ok())
        .map(|units| units.normalized())
        .unwrap_or_default()
}

/// 日志用的金额展示："0.4 MON"
pub fn format_amount(wei: U256, ticker: &str) -> String {
    format!("{} {}", wei_to_decimal(wei), ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_wei_in_native_units() {
        assert_eq!(
            format_amount(U256::from(400_000_000_000_000_000u64), "MON"),
            "0.4 MON"
        );
        assert_eq!(wei_to_decimal(U256::zero()), BigDecimal::from(0));
    }

    #[test]
    fn keeps_full_wei_precision() {
        assert_eq!(
            wei_to_decimal(U256::from(1_000_000_000_000_000_001u64)),
            BigDecimal::from_str("1.000000000000000001").unwrap()
        );
    }
}
