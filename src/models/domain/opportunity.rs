use bigdecimal::BigDecimal;
use std::fmt;

/// 页面上检测到的铸造价格
///
/// `Unknown` 表示既没有 FREE 也没有 "<数字> <币种>"，不能当作免费处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintPrice {
    Free,
    Amount(BigDecimal),
    Unknown,
}

impl MintPrice {
    /// 可提交时的单价；Unknown 返回 None
    pub fn amount(&self) -> Option<BigDecimal> {
        match self {
            MintPrice::Free => Some(BigDecimal::from(0)),
            MintPrice::Amount(v) => Some(v.clone()),
            MintPrice::Unknown => None,
        }
    }
}

impl fmt::Display for MintPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintPrice::Free => f.write_str("FREE"),
            MintPrice::Amount(v) => write!(f, "{}", v),
            MintPrice::Unknown => f.write_str("unknown"),
        }
    }
}

/// 单轮检测结果，用完即弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOpportunity {
    pub price: MintPrice,
    /// 原样保留页面中的大小写，不做 checksum 规范化
    pub contract_address: String,
}
