//! 티커 정규화.

/// 티커를 조회 키로 쓸 수 있게 정규화합니다 (공백 제거 + 대문자).
///
/// 비어 있거나 공백뿐인 티커는 `None`을 반환합니다.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("engro"), Some("ENGRO".to_string()));
        assert_eq!(normalize_ticker("  Luck \n"), Some("LUCK".to_string()));
        assert_eq!(normalize_ticker(""), None);
        assert_eq!(normalize_ticker(" \t "), None);
    }
}
