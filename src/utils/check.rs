/// 仅做语法校验：小写 0x 前缀 + 40 位十六进制，不校验 EIP-55 校验和、不检查合约是否存在
///
/// 与 `Address::from_str` 保持一致，`0X` 前缀不接受
pub fn is_valid_address(candidate: &str) -> bool {
    match candidate.strip_prefix("0x") {
        Some(hex_part) => hex_part.len() == 40 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
