//! # Restyler Library
//!
//! 翻译流水线用的无状态 HTML 变换：属性清理、译文样式还原和链接本地化。
//!
//! ## 模块组织
//!
//! - `core` - 字符串层面的主要操作
//! - `parsers` - DOM 处理（清理、还原、链接重写）
//! - `request` - 请求/响应封装与批量处理
//! - `config` - 配置文件加载
//! - `env` - 环境变量
//! - `error` - 错误类型
//! - `utils` - 工具函数

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod parsers;
pub mod request;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{ConfigManager, RestyleConfig};
pub use crate::core::*;
pub use error::{RestyleError, RestyleResult};
pub use parsers::*;
pub use request::{handle, process_batch, BatchItem, Operation, TransformRequest, TransformResponse};
