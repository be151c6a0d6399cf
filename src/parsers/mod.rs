//! # 解析器模块
//!
//! 这个模块包含所有基于 DOM 的变换：
//!
//! - HTML解析、属性清理和序列化
//! - 译文样式还原
//! - 链接重写和本地化
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、属性清理
//! - `restorer` - 把译文文本放回带样式的原文结构
//! - `link_rewriter` - 跳转链接拆解、语言前缀、站外标记

pub mod html;
pub mod link_rewriter;
pub mod restorer;

// Re-export commonly used items for convenience
pub use html::{
    decode_html, sanitize, serialize_content, serialize_document, AttributeAllowList, Document,
    DocumentKind,
};
pub use link_rewriter::{
    rewrite_document_links, rewrite_link, rewrite_links_in_html, LinkRewriter, LinkStats,
    Redirector, RewrittenLink,
};
pub use restorer::{restore, RestoreMode};
