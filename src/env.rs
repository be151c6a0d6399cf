//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问

use std::env;
use std::fmt;

use crate::parsers::restorer::RestoreMode;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 未设置时返回 `Ok(None)`，设置了但无效时返回错误
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "RESTYLER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.trim().to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }

    /// 配置文件路径
    pub struct ConfigPath;
    impl EnvVar<String> for ConfigPath {
        const NAME: &'static str = "RESTYLER_CONFIG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Explicit configuration file path (TOML or JSON)";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }
}

/// 变换相关环境变量
pub mod restyle {
    use super::*;

    /// 默认语言（不加路径前缀）
    pub struct DefaultLocale;
    impl EnvVar<String> for DefaultLocale {
        const NAME: &'static str = "RESTYLER_DEFAULT_LOCALE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Default locale that never receives a path prefix";

        fn parse(value: &str) -> EnvResult<String> {
            parse_locale(value, Self::NAME)
        }
    }

    /// 站点域名
    pub struct SiteDomain;
    impl EnvVar<String> for SiteDomain {
        const NAME: &'static str = "RESTYLER_SITE_DOMAIN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Hostname treated as internal when rewriting links";

        fn parse(value: &str) -> EnvResult<String> {
            let domain = non_empty(value, Self::NAME)?.to_ascii_lowercase();
            if domain.contains('/') || domain.contains(char::is_whitespace) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Must be a bare hostname without scheme or path".to_string(),
                });
            }
            Ok(domain)
        }
    }

    /// 属性允许列表
    pub struct AllowedAttributes;
    impl EnvVar<Vec<String>> for AllowedAttributes {
        const NAME: &'static str = "RESTYLER_ALLOWED_ATTRIBUTES";
        const DEFAULT: Option<Vec<String>> = None;
        const DESCRIPTION: &'static str = "Comma separated attribute names kept by the sanitizer";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            Ok(value
                .split(',')
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect())
        }
    }

    /// 样式还原策略
    pub struct Restore;
    impl EnvVar<RestoreMode> for Restore {
        const NAME: &'static str = "RESTYLER_RESTORE_MODE";
        const DEFAULT: Option<RestoreMode> = Some(RestoreMode::Flat);
        const DESCRIPTION: &'static str = "Default restore mode: flat, recursive, replace";

        fn parse(value: &str) -> EnvResult<RestoreMode> {
            value.parse().map_err(|message| EnvError {
                variable: Self::NAME.to_string(),
                message,
            })
        }
    }
}

/// 性能相关环境变量
pub mod performance {
    use super::*;

    /// 批量处理线程数
    pub struct WorkerThreads;
    impl EnvVar<usize> for WorkerThreads {
        const NAME: &'static str = "RESTYLER_WORKER_THREADS";
        const DEFAULT: Option<usize> = None;
        const DESCRIPTION: &'static str = "Worker threads used for batch processing";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 256)
        }
    }
}

fn non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

fn parse_locale(value: &str, var_name: &str) -> EnvResult<String> {
    let locale = non_empty(value, var_name)?.to_ascii_lowercase();
    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid locale code '{}'", value),
        });
    }
    Ok(locale)
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive integer".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value too small (minimum: {})", min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value too large (maximum: {})", max),
        });
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: \"info\")\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        core::ConfigPath::NAME,
        core::ConfigPath::DESCRIPTION
    ));

    docs.push_str("\n## Restyle Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {}\n",
        restyle::DefaultLocale::NAME,
        restyle::DefaultLocale::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        restyle::SiteDomain::NAME,
        restyle::SiteDomain::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        restyle::AllowedAttributes::NAME,
        restyle::AllowedAttributes::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        restyle::Restore::NAME,
        restyle::Restore::DESCRIPTION,
        restyle::Restore::DEFAULT
    ));

    docs.push_str("\n## Performance Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {}\n",
        performance::WorkerThreads::NAME,
        performance::WorkerThreads::DESCRIPTION
    ));

    docs
}
