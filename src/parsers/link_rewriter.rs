//! 链接重写模块
//!
//! 负责把文档中的链接本地化：
//!
//! 1. 拆开搜索引擎跳转链接（如 `https://www.google.com/url?q=...`）
//! 2. 给站内链接加上语言前缀（`/de/...`），重复执行不会叠加
//! 3. 标记站外链接，批量处理时为其加上 `target="_blank"` 和 `rel`
//!
//! 任何 href 解析失败都在本模块内消化：原 href 保持不变，继续处理后续链接。

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::constants;
use crate::parsers::html::{
    descendants, get_node_attr, get_node_name, serialize_document, set_node_attr, Document,
};
use crate::utils::url::{
    encode_path_segment, is_http_url, is_non_navigational, parse_href, HrefParseError,
    ParsedHref,
};

const EXTERNAL_TARGET: &str = "_blank";
const EXTERNAL_REL: &str = "noopener noreferrer";

/// 跳转链接模式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirector {
    /// 主机名中包含的片段
    pub host: String,
    /// 路径前缀
    pub path_prefix: String,
    /// 承载目标地址的查询参数
    pub param: String,
}

impl Redirector {
    pub fn new(host: &str, path_prefix: &str, param: &str) -> Self {
        Self {
            host: host.to_ascii_lowercase(),
            path_prefix: path_prefix.to_string(),
            param: param.to_string(),
        }
    }

    /// Google 搜索结果跳转
    pub fn google() -> Self {
        Self::new(
            constants::GOOGLE_REDIRECT_HOST,
            constants::GOOGLE_REDIRECT_PATH,
            constants::GOOGLE_REDIRECT_PARAM,
        )
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host.to_ascii_lowercase().contains(&self.host))
            .unwrap_or(false)
            && url.path().starts_with(&self.path_prefix)
    }

    /// 提取并解码目标地址
    fn target(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty())
    }
}

/// 单个链接的重写结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLink {
    pub href: String,
    pub is_external: bool,
}

impl RewrittenLink {
    fn unchanged(href: &str) -> Self {
        Self {
            href: href.to_string(),
            is_external: false,
        }
    }
}

/// 批量重写统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub anchors: usize,
    pub rewritten: usize,
    pub external: usize,
}

/// 链接重写器
///
/// 只持有不可变配置，可在请求之间自由复制。
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    site_domain: String,
    default_locale: String,
    redirectors: Vec<Redirector>,
}

impl LinkRewriter {
    pub fn new(site_domain: &str) -> Self {
        Self {
            site_domain: site_domain.trim().to_ascii_lowercase(),
            default_locale: constants::DEFAULT_LOCALE.to_string(),
            redirectors: vec![Redirector::google()],
        }
    }

    pub fn with_default_locale(mut self, locale: &str) -> Self {
        self.default_locale = locale.trim().to_ascii_lowercase();
        self
    }

    pub fn with_redirectors(mut self, redirectors: Vec<Redirector>) -> Self {
        self.redirectors = redirectors;
        self
    }

    pub fn site_domain(&self) -> &str {
        &self.site_domain
    }

    /// 重写单个链接
    pub fn rewrite(&self, href: &str, locale: Option<&str>) -> RewrittenLink {
        let trimmed = href.trim();
        if trimmed.is_empty() {
            return RewrittenLink::unchanged(href);
        }
        if is_non_navigational(trimmed) {
            return RewrittenLink {
                href: href.to_string(),
                is_external: self.is_external(trimmed),
            };
        }

        let working = self.unwrap_redirect(trimmed);
        if let Err(e) = parse_href(&working) {
            tracing::debug!("链接解析失败，保持原样: {}", e);
            return RewrittenLink::unchanged(href);
        }

        let localized = match self.active_locale(locale) {
            Some(locale) => match self.localize(&working, &locale) {
                Ok(Some(localized)) => localized,
                Ok(None) => working,
                Err(e) => {
                    tracing::debug!("链接解析失败，保持原样: {}", e);
                    return RewrittenLink::unchanged(href);
                }
            },
            None => working,
        };

        let is_external = self.is_external(&localized);
        RewrittenLink {
            href: if localized == trimmed {
                href.to_string()
            } else {
                localized
            },
            is_external,
        }
    }

    /// 重写文档中所有带 href 的 <a> 元素
    pub fn rewrite_document(&self, document: Document, locale: Option<&str>) -> Document {
        let stats = self.rewrite_anchors(document.document(), locale);
        tracing::debug!(
            "链接重写完成: {} 个链接, 修改 {} 个, 站外 {} 个",
            stats.anchors,
            stats.rewritten,
            stats.external
        );
        document
    }

    /// 遍历节点并重写锚点链接
    pub fn rewrite_anchors(&self, root: &Handle, locale: Option<&str>) -> LinkStats {
        let mut stats = LinkStats::default();

        for node in descendants(root) {
            if get_node_name(&node) != Some("a") {
                continue;
            }
            let Some(href) = get_node_attr(&node, "href") else {
                continue;
            };

            stats.anchors += 1;
            let rewritten = self.rewrite(&href, locale);

            if rewritten.href != href {
                set_node_attr(&node, "href", Some(rewritten.href));
                stats.rewritten += 1;
            }

            if rewritten.is_external {
                set_node_attr(&node, "target", Some(EXTERNAL_TARGET.to_string()));
                set_node_attr(&node, "rel", Some(EXTERNAL_REL.to_string()));
                stats.external += 1;
            }
        }

        stats
    }

    /// 拆开跳转链接，直到不再匹配任何跳转模式；没有目标参数时原样返回
    ///
    /// 每次拆出的目标都是原链接查询串的一部分，长度严格变短，循环必然结束。
    fn unwrap_redirect(&self, href: &str) -> String {
        let mut current = href.to_string();

        loop {
            let url = match parse_href(&current) {
                Ok(ParsedHref::Absolute(url)) | Ok(ParsedHref::ProtocolRelative(url)) => url,
                _ => break,
            };
            let target = self
                .redirectors
                .iter()
                .filter(|redirector| redirector.matches(&url))
                .find_map(|redirector| redirector.target(&url));

            match target {
                Some(target) if target.len() < current.len() => current = target,
                _ => break,
            }
        }

        current
    }

    /// 非默认语言才返回
    fn active_locale(&self, locale: Option<&str>) -> Option<String> {
        let locale = locale?.trim().to_ascii_lowercase();
        if locale.is_empty() || locale == self.default_locale {
            None
        } else {
            Some(locale)
        }
    }

    /// 给站内链接加语言前缀；无需修改时返回 `None`
    fn localize(&self, href: &str, locale: &str) -> Result<Option<String>, HrefParseError> {
        let parsed = parse_href(href)?;

        let eligible = match &parsed {
            ParsedHref::Absolute(url) => is_http_url(url) && self.is_site_host(url.host_str()),
            ParsedHref::ProtocolRelative(url) => self.is_site_host(url.host_str()),
            ParsedHref::Relative { path, .. } => path.starts_with('/'),
        };
        if !eligible {
            return Ok(None);
        }

        let segment = encode_path_segment(locale);
        let prefix = format!("/{}", segment);
        let path = parsed.path();
        if path == prefix || path.starts_with(&format!("{}/", prefix)) {
            return Ok(None);
        }

        let new_path = if path.is_empty() {
            format!("{}/", prefix)
        } else {
            format!("{}{}", prefix, path)
        };
        Ok(Some(parsed.with_path(&new_path)))
    }

    /// 不含站点域名、不以 `/` 或 `#` 开头的链接为站外链接
    fn is_external(&self, href: &str) -> bool {
        !href.to_ascii_lowercase().contains(&self.site_domain)
            && !href.starts_with('/')
            && !href.starts_with('#')
    }

    fn is_site_host(&self, host: Option<&str>) -> bool {
        host.map(|host| host.eq_ignore_ascii_case(&self.site_domain))
            .unwrap_or(false)
    }
}

/// 重写单个链接
pub fn rewrite_link(href: &str, locale: Option<&str>, site_domain: &str) -> RewrittenLink {
    LinkRewriter::new(site_domain).rewrite(href, locale)
}

/// 重写文档中的所有链接
pub fn rewrite_document_links(
    document: Document,
    locale: Option<&str>,
    rewriter: &LinkRewriter,
) -> Document {
    rewriter.rewrite_document(document, locale)
}

/// 重写HTML字符串中的链接
pub fn rewrite_links_in_html(html: &str, locale: Option<&str>, rewriter: &LinkRewriter) -> String {
    let document = Document::parse(html);
    let document = rewriter.rewrite_document(document, locale);
    serialize_document(&document)
}
