//! 配置管理模块
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, RestyleConfig};

/// 配置常量
pub mod constants {
    /// 清理时保留的属性
    pub const DEFAULT_ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "id", "title", "target"];

    /// 默认语言，不会出现在路径前缀中
    pub const DEFAULT_LOCALE: &str = "en";

    // Google 搜索结果跳转链接
    pub const GOOGLE_REDIRECT_HOST: &str = "google.";
    pub const GOOGLE_REDIRECT_PATH: &str = "/url";
    pub const GOOGLE_REDIRECT_PARAM: &str = "q";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "restyler.toml",
        ".restyler.toml",
        "~/.config/restyler/config.toml",
        "/etc/restyler/config.toml",
    ];

    // 环境变量文件
    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];
}
