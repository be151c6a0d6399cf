//! href 解析工具
//!
//! 把 href 拆分成绝对 URL、协议相对 URL 或站内相对路径。
//! 解析失败以 `HrefParseError` 返回，由调用方决定如何降级。

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;
pub use url::Url;

/// 不参与重写的伪协议
pub const NON_NAVIGATIONAL_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:", "blob:"];

/// 路径段编码集合
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'<').add(b'>').add(b'`')
    .add(b'#').add(b'?').add(b'{').add(b'}').add(b'/').add(b'%');

/// 协议相对 URL 解析时借用的协议
const PROTOCOL_RELATIVE_SCHEME: &str = "https:";

/// href 解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HrefParseError {
    #[error("href 为空")]
    Empty,

    #[error("无法解析 href '{href}': {source}")]
    Invalid {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// 解析后的 href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedHref {
    /// 带协议的绝对 URL
    Absolute(Url),
    /// `//host/path` 形式，按 https 解析
    ProtocolRelative(Url),
    /// 无主机部分：路径加上原样保留的查询与片段
    Relative { path: String, suffix: String },
}

impl ParsedHref {
    /// 主机名（相对路径没有）
    pub fn host(&self) -> Option<&str> {
        match self {
            ParsedHref::Absolute(url) | ParsedHref::ProtocolRelative(url) => url.host_str(),
            ParsedHref::Relative { .. } => None,
        }
    }

    /// 路径部分
    pub fn path(&self) -> &str {
        match self {
            ParsedHref::Absolute(url) | ParsedHref::ProtocolRelative(url) => url.path(),
            ParsedHref::Relative { path, .. } => path,
        }
    }

    /// 替换路径后重新组装 href，其余部分保持不变
    pub fn with_path(self, new_path: &str) -> String {
        match self {
            ParsedHref::Absolute(mut url) => {
                url.set_path(new_path);
                url.to_string()
            }
            ParsedHref::ProtocolRelative(mut url) => {
                url.set_path(new_path);
                let serialized = url.to_string();
                serialized
                    .strip_prefix(PROTOCOL_RELATIVE_SCHEME)
                    .map(str::to_string)
                    .unwrap_or(serialized)
            }
            ParsedHref::Relative { suffix, .. } => format!("{}{}", new_path, suffix),
        }
    }
}

/// 解析 href
pub fn parse_href(href: &str) -> Result<ParsedHref, HrefParseError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(HrefParseError::Empty);
    }

    if href.starts_with("//") {
        let with_scheme = format!("{}{}", PROTOCOL_RELATIVE_SCHEME, href);
        return Url::parse(&with_scheme)
            .map(ParsedHref::ProtocolRelative)
            .map_err(|source| HrefParseError::Invalid {
                href: href.to_string(),
                source,
            });
    }

    match Url::parse(href) {
        Ok(url) => Ok(ParsedHref::Absolute(url)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let split_at = href.find(['?', '#']).unwrap_or(href.len());
            let (path, suffix) = href.split_at(split_at);
            Ok(ParsedHref::Relative {
                path: path.to_string(),
                suffix: suffix.to_string(),
            })
        }
        Err(source) => Err(HrefParseError::Invalid {
            href: href.to_string(),
            source,
        }),
    }
}

/// 是否为伪协议链接
pub fn is_non_navigational(href: &str) -> bool {
    let lowered = href.trim_start().to_ascii_lowercase();
    NON_NAVIGATIONAL_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// 是否为 http(s) 协议
pub fn is_http_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// 编码单个路径段
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let parsed = parse_href("https://Example.com/a/b?x=1#top").unwrap();
        assert_eq!(parsed.host(), Some("example.com"));
        assert_eq!(parsed.path(), "/a/b");
        assert_eq!(parsed.with_path("/de/a/b"), "https://example.com/de/a/b?x=1#top");
    }

    #[test]
    fn test_parse_protocol_relative() {
        let parsed = parse_href("//example.com/a?x").unwrap();
        assert!(matches!(parsed, ParsedHref::ProtocolRelative(_)));
        assert_eq!(parsed.host(), Some("example.com"));
        assert_eq!(parsed.with_path("/ka/a"), "//example.com/ka/a?x");
    }

    #[test]
    fn test_parse_relative() {
        let parsed = parse_href("/contact?ref=1#form").unwrap();
        assert_eq!(
            parsed,
            ParsedHref::Relative {
                path: "/contact".to_string(),
                suffix: "?ref=1#form".to_string()
            }
        );
        assert_eq!(parsed.host(), None);
        assert_eq!(parsed.with_path("/de/contact"), "/de/contact?ref=1#form");

        let parsed = parse_href("#section").unwrap();
        assert_eq!(parsed.path(), "");
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_href("  "), Err(HrefParseError::Empty));
        assert!(matches!(
            parse_href("http://[::1"),
            Err(HrefParseError::Invalid { .. })
        ));
        assert!(matches!(
            parse_href("https://exa mple.com/"),
            Err(HrefParseError::Invalid { .. })
        ));
    }

    #[test]
    fn test_is_non_navigational() {
        assert!(is_non_navigational("javascript:void(0)"));
        assert!(is_non_navigational("MAILTO:test@example.com"));
        assert!(is_non_navigational("tel:+995"));
        assert!(is_non_navigational("data:text/plain;base64,SGVsbG8="));
        assert!(!is_non_navigational("https://example.com"));
        assert!(!is_non_navigational("/relative/path"));
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("de"), "de");
        assert_eq!(encode_path_segment("pt br"), "pt%20br");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
    }
}
