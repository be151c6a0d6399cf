//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 文档解析与基础DOM操作
//! - `sanitizer`: 属性清理
//! - `serializer`: 序列化功能

pub mod dom;
pub mod sanitizer;
pub mod serializer;
pub mod utils;

pub use dom::{
    collect_text_leaves, descendants, find_nodes, get_child_node_by_name, get_node_attr,
    get_node_name, get_text, decode_html, set_node_attr, set_text, Document, DocumentKind,
};
pub use sanitizer::{sanitize, AttributeAllowList};
pub use serializer::{serialize_children, serialize_content, serialize_document, serialize_node};
pub use utils::{has_body_tag, is_blank, is_full_document, WHITESPACES};
