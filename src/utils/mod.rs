//! # 工具模块
//!
//! - `url` - href 拆分、伪协议识别、路径段编码

pub mod url;

// Re-export commonly used items for convenience
pub use url::{is_non_navigational, parse_href, HrefParseError, ParsedHref, Url};
