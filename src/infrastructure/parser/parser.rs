use crate::errors::AppError;
use crate::models::{MintOpportunity, MintPrice};
use bigdecimal::BigDecimal;
use regex::Regex;
use std::str::FromStr;

/// 铸造详情提取器：对页面文本做 first-match 的正则匹配，而不是依赖完整 DOM 结构
///
/// 页面结构随时会改，这里只要求两样东西能被找到：
/// - 文本节点中的价格：`FREE`，或 `<数字> <币种>`（均不区分大小写）
/// - `<a href>` 中指向区块浏览器地址页的链接，里面带 `0x` + 40位hex
pub struct MintDetailExtractor {
    tag: Regex,
    price: Regex,
    anchor_href: Regex,
    explorer_link: Regex,
    address: Regex,
}

impl MintDetailExtractor {
    pub fn new(currency_ticker: &str, explorer_pattern: &str) -> Result<Self, AppError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| AppError::Validation(format!("正则编译失败 {}: {}", pattern, e)))
        };

        Ok(Self {
            tag: compile(r"(?s)<[^>]*>")?,
            price: compile(&format!(
                // 币种后必须是词边界，"2 months" / "3 Monad" 不算价格
                r"(?i)\bFREE\b|(\d{{1,3}}(?:,\d{{3}})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*{}(?:\W|$)",
                regex::escape(currency_ticker.trim())
            ))?,
            anchor_href: compile(
                r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#,
            )?,
            explorer_link: compile(&format!("{}0x[a-fA-F0-9]{{40}}", explorer_pattern))?,
            address: compile(r"0x[a-fA-F0-9]{40}")?,
        })
    }

    /// 没有页面内容、或找不到合约地址时返回 None（本轮无可铸造，不是错误）
    pub fn extract(&self, markup: Option<&str>) -> Option<MintOpportunity> {
        let markup = markup?;
        let contract_address = self.find_contract_address(markup)?;
        Some(MintOpportunity {
            price: self.find_price(markup),
            contract_address,
        })
    }

    fn find_price(&self, markup: &str) -> MintPrice {
        for node in self.text_nodes(markup) {
            let Some(caps) = self.price.captures(&node) else {
                continue;
            };
            return match caps.get(1) {
                // 数字匹配但解析失败时按 Unknown 处理，避免少付
                Some(number) => BigDecimal::from_str(&number.as_str().replace(',', ""))
                    .map(MintPrice::Amount)
                    .unwrap_or(MintPrice::Unknown),
                None => MintPrice::Free,
            };
        }
        MintPrice::Unknown
    }

    fn find_contract_address(&self, markup: &str) -> Option<String> {
        self.anchor_href
            .captures_iter(markup)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|href| href.as_str())
            .find(|href| self.explorer_link.is_match(href))
            .and_then(|href| self.address.find(href))
            .map(|m| m.as_str().to_string())
    }

    /// 标签之间的文本片段，处理常见的空白实体
    fn text_nodes(&self, markup: &str) -> Vec<String> {
        self.tag
            .split(markup)
            .map(|text| text.replace("&nbsp;", " ").replace("&#160;", " "))
            .filter(|text| !text.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xAbCdEf0123456789abcdef0123456789ABCDEF01";

    fn extractor() -> MintDetailExtractor {
        MintDetailExtractor::new("MON", r"monad\.xyz/explorer/address/").unwrap()
    }

    fn link(addr: &str) -> String {
        format!(
            r#"<a class="explorer" href="https://testnet.monad.xyz/explorer/address/{}">View contract</a>"#,
            addr
        )
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn no_markup_yields_nothing() {
        assert_eq!(extractor().extract(None), None);
    }

    #[test]
    fn missing_address_link_yields_nothing_regardless_of_price() {
        let ex = extractor();
        for body in [
            "<div>FREE</div>",
            "<span>0.5 MON</span>",
            "<p>nothing here</p>",
            // 地址在文本里而不在浏览器链接里
            format!("<p>{}</p><span>1 MON</span>", ADDR).as_str(),
            // 链接指向别的站点
            format!(r#"<a href="https://etherscan.io/address/{}">x</a>"#, ADDR).as_str(),
        ] {
            assert_eq!(ex.extract(Some(body)), None, "markup: {}", body);
        }
    }

    #[test]
    fn free_token_yields_zero_price() {
        let html = format!("<div><span>Price</span><b>free</b>{}</div>", link(ADDR));
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Free);
        assert_eq!(opp.price.amount(), Some(BigDecimal::from(0)));
        assert_eq!(opp.contract_address, ADDR);
    }

    #[test]
    fn numeric_price_ignores_whitespace_and_ticker_case() {
        let ex = extractor();
        for (text, expected) in [
            ("0.5 MON", "0.5"),
            ("0.5MON", "0.5"),
            ("  12.25   mon ", "12.25"),
            ("Price: 3 Mon", "3"),
            ("0.5&nbsp;MON", "0.5"),
            ("1,000 MON", "1000"),
        ] {
            let html = format!("<div><span>{}</span>{}</div>", text, link(ADDR));
            let opp = ex.extract(Some(&html)).unwrap();
            assert_eq!(opp.price, MintPrice::Amount(dec(expected)), "text: {}", text);
        }
    }

    #[test]
    fn first_price_match_wins() {
        let html = format!(
            "<ul><li>0.25 MON</li><li>FREE</li><li>9 MON</li></ul>{}",
            link(ADDR)
        );
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Amount(dec("0.25")));
    }

    #[test]
    fn missing_price_is_unknown_not_free() {
        let html = format!("<div><h1>Mint live</h1>{}</div>", link(ADDR));
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Unknown);
        assert_eq!(opp.price.amount(), None);
    }

    #[test]
    fn first_explorer_link_is_taken_verbatim() {
        let second = "0x1111111111111111111111111111111111111111";
        let html = format!(
            r#"<a href="/home">home</a>{}{}<p>FREE</p>"#,
            link(ADDR),
            link(second)
        );
        let opp = extractor().extract(Some(&html)).unwrap();
        // 大小写原样保留
        assert_eq!(opp.contract_address, ADDR);
    }

    #[test]
    fn accepts_single_quoted_and_multiline_anchor_attributes() {
        let html = format!(
            "<a\n  target='_blank'\n  href='https://monad.xyz/explorer/address/{}'>c</a><i>1 MON</i>",
            ADDR
        );
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.contract_address, ADDR);
        assert_eq!(opp.price, MintPrice::Amount(dec("1")));
    }

    #[test]
    fn words_starting_with_ticker_are_not_prices() {
        let html = format!(
            "<p>Public phase ends in 2 months</p><p>Live on 3 Monad testnets</p><b>FREE</b>{}",
            link(ADDR)
        );
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Free);

        let html = format!("<p>2 months left</p><span>0.5 MON.</span>{}", link(ADDR));
        let opp = extractor().extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Amount(dec("0.5")));
    }

    #[test]
    fn data_href_attribute_is_not_the_link() {
        let decoy = "0x1111111111111111111111111111111111111111";
        let html = format!(
            r#"<a data-href="https://monad.xyz/explorer/address/{}" href="/x">x</a><p>FREE</p>"#,
            decoy
        );
        assert_eq!(extractor().extract(Some(&html)), None);

        let html = format!(
            r#"<a data-href="https://monad.xyz/explorer/address/{}" href="/x">x</a>{}<p>FREE</p>"#,
            decoy,
            link(ADDR)
        );
        assert_eq!(extractor().extract(Some(&html)).unwrap().contract_address, ADDR);
    }

    #[test]
    fn short_address_in_link_is_ignored() {
        let html = format!("{}<p>FREE</p>", link("0x1234"));
        assert_eq!(extractor().extract(Some(&html)), None);
    }

    #[test]
    fn extraction_is_deterministic() {
        let ex = extractor();
        let html = format!("<div>0.5 MON</div>{}", link(ADDR));
        let first = ex.extract(Some(&html));
        for _ in 0..5 {
            assert_eq!(ex.extract(Some(&html)), first);
        }
    }

    #[test]
    fn ticker_is_configurable() {
        let ex = MintDetailExtractor::new("ETH", r"monad\.xyz/explorer/address/").unwrap();
        let html = format!("<div>0.5 MON</div><div>0.02 eth</div>{}", link(ADDR));
        let opp = ex.extract(Some(&html)).unwrap();
        assert_eq!(opp.price, MintPrice::Amount(dec("0.02")));
    }
}
