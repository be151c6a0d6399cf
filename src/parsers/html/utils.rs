use once_cell::sync::Lazy;
use regex::Regex;

/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 内部文本不参与对齐的元素
pub const TEXT_SKIP_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// 可作为整体替换依据的内容容器
pub const CONTENT_CONTAINERS: &[&str] = &["body", "main", "article"];

static FULL_DOCUMENT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<!doctype|<\s*(?:html|head|body)[\s>/]").expect("valid document marker")
});

static BODY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*body[\s>/]").expect("valid body marker"));

/// 输入是否像一个完整文档
pub fn is_full_document(html: &str) -> bool {
    FULL_DOCUMENT_MARKER.is_match(html)
}

/// 输入是否显式包含 <body> 标签
pub fn has_body_tag(html: &str) -> bool {
    BODY_MARKER.is_match(html)
}

/// 是否为纯空白
pub fn is_blank(s: &str) -> bool {
    s.trim_matches(WHITESPACES).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_full_document() {
        assert!(is_full_document("<!DOCTYPE html><p>x</p>"));
        assert!(is_full_document("<html lang=\"ka\">"));
        assert!(is_full_document("<Body>x</Body>"));
        assert!(!is_full_document("<p>html body head</p>"));
        assert!(!is_full_document("<header>x</header>"));
        assert!(!is_full_document("<bodyguard>x</bodyguard>"));
    }

    #[test]
    fn test_has_body_tag() {
        assert!(has_body_tag("<html><body class=\"x\"></body></html>"));
        assert!(has_body_tag("<BODY>"));
        assert!(!has_body_tag("<html><head></head></html>"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(!is_blank(" a "));
    }
}
