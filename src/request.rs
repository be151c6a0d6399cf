//! 请求封装
//!
//! 把 `{html, lang?, original_html?, ...}` 形式的请求分派给对应操作，
//! 并构建 `{success, ...字段, error?}` 形式的响应。

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RestyleConfig;
use crate::core::{extract_body, restore_html, sanitize_html};
use crate::error::{RestyleError, RestyleResult};
use crate::parsers::html::is_blank;
use crate::parsers::link_rewriter::rewrite_links_in_html;
use crate::parsers::restorer::RestoreMode;

/// 支持的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Sanitize,
    ExtractBody,
    RestoreStyles,
    RebuildStyles,
    RewriteLinks,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Sanitize,
        Operation::ExtractBody,
        Operation::RestoreStyles,
        Operation::RebuildStyles,
        Operation::RewriteLinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sanitize => "sanitize",
            Operation::ExtractBody => "extract-body",
            Operation::RestoreStyles => "restore-styles",
            Operation::RebuildStyles => "rebuild-styles",
            Operation::RewriteLinks => "rewrite-links",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == lowered)
            .ok_or_else(|| {
                format!(
                    "Invalid operation '{}'. Use: sanitize, extract-body, restore-styles, rebuild-styles, rewrite-links",
                    s
                )
            })
    }
}

/// 请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformRequest {
    pub html: Option<String>,
    pub lang: Option<String>,
    pub original_html: Option<String>,
    pub translated_html: Option<String>,
    pub original_body: Option<String>,
    pub translated_text: Option<String>,
    pub mode: Option<RestoreMode>,
    pub site_domain: Option<String>,
}

/// 响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformResponse {
    fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// 失败响应
    pub fn failure(error: &RestyleError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// 批量请求中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchItem {
    pub op: Operation,
    #[serde(flatten)]
    pub request: TransformRequest,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> RestyleResult<&'a str> {
    match value.as_deref() {
        Some(v) if !is_blank(v) => Ok(v),
        _ => Err(RestyleError::MissingInput(field.to_string())),
    }
}

/// 处理单个请求
///
/// 必填字段缺失或为空白时返回 [`RestyleError::MissingInput`]，字段名即请求中的键名。
pub fn handle(
    op: Operation,
    request: &TransformRequest,
    config: &RestyleConfig,
) -> RestyleResult<TransformResponse> {
    tracing::debug!("处理请求: {}", op);

    let mut response = TransformResponse::ok();
    match op {
        Operation::Sanitize => {
            let html = required(&request.html, "html")?;
            response.clean_html = Some(sanitize_html(html, &config.allow_list()));
        }
        Operation::ExtractBody => {
            let html = required(&request.html, "html")?;
            let extracted = extract_body(html)?;
            response.clean_body = Some(extracted.clean_body);
            response.original_body = Some(extracted.original_body);
        }
        Operation::RestoreStyles => {
            let original = required(&request.original_html, "original_html")?;
            let translated = required(&request.translated_html, "translated_html")?;
            let mode = request.mode.unwrap_or(config.restore_mode);
            response.html = Some(restore_html(original, translated, mode));
        }
        Operation::RebuildStyles => {
            let original = required(&request.original_body, "original_body")?;
            let translated = required(&request.translated_text, "translated_text")?;
            let mode = request.mode.unwrap_or(config.restore_mode);
            response.translated_html = Some(restore_html(original, translated, mode));
        }
        Operation::RewriteLinks => {
            let html = required(&request.html, "html")?;
            let lang = required(&request.lang, "lang")?;
            let rewriter = config.link_rewriter(request.site_domain.as_deref())?;
            response.html = Some(rewrite_links_in_html(html, Some(lang), &rewriter));
        }
    }

    Ok(response)
}

/// 处理单个请求，错误折叠进响应
pub fn handle_to_response(
    op: Operation,
    request: &TransformRequest,
    config: &RestyleConfig,
) -> TransformResponse {
    handle(op, request, config).unwrap_or_else(|e| {
        tracing::warn!("请求处理失败 ({}): {}", op, e);
        TransformResponse::failure(&e)
    })
}

/// 并行处理一批请求
///
/// 每个条目在工作线程里独立解析，线程之间只传递字符串。
/// 单个条目失败不会中断整批，结果顺序与输入一致。
pub fn process_batch(items: &[BatchItem], config: &RestyleConfig) -> Vec<TransformResponse> {
    let run = || -> Vec<TransformResponse> {
        items
            .par_iter()
            .map(|item| handle_to_response(item.op, &item.request, config))
            .collect()
    };

    let responses = match config.worker_threads {
        Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                tracing::warn!("创建线程池失败，使用全局线程池: {}", e);
                run()
            }
        },
        None => run(),
    };

    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!("批量处理完成: {} 项, {} 项失败", responses.len(), failed);

    responses
}
