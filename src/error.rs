//! 统一错误处理
//!
//! 核心变换本身是全函数：畸形标记由解析器容忍，链接解析失败在重写器内部消化。
//! 这里的错误只出现在请求边界、正文提取和配置加载上。

use std::fmt;

use thiserror::Error;

/// 处理错误类型
#[derive(Error, Debug)]
pub enum RestyleError {
    /// 请求缺少必填字段
    #[error("请求缺少必填字段: {0}")]
    MissingInput(String),

    /// 输入文档中没有 <body>
    #[error("未找到 <body> 元素")]
    NoBody,

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl RestyleError {
    /// 是否由调用方输入引起
    pub fn is_client_error(&self) -> bool {
        matches!(self, RestyleError::MissingInput(_) | RestyleError::NoBody)
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            RestyleError::MissingInput(_) | RestyleError::NoBody => ErrorCategory::Input,
            RestyleError::ConfigError(_) => ErrorCategory::Configuration,
            RestyleError::Io(_) => ErrorCategory::Io,
            RestyleError::SerializationError(_) => ErrorCategory::Serialization,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        match self {
            RestyleError::ConfigError(msg) => {
                RestyleError::ConfigError(format!("{} (上下文: {})", msg, context))
            }
            RestyleError::SerializationError(msg) => {
                RestyleError::SerializationError(format!("{} (上下文: {})", msg, context))
            }
            other => other,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Serialization,
}

impl From<serde_json::Error> for RestyleError {
    fn from(error: serde_json::Error) -> Self {
        RestyleError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for RestyleError {
    fn from(error: toml::de::Error) -> Self {
        RestyleError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<toml::ser::Error> for RestyleError {
    fn from(error: toml::ser::Error) -> Self {
        RestyleError::SerializationError(format!("TOML序列化错误: {}", error))
    }
}

/// 错误结果类型别名
pub type RestyleResult<T> = Result<T, RestyleError>;
