//! 配置管理器
//!
//! 加载顺序：`.env` 文件 → 配置文件（TOML/JSON） → 环境变量覆盖 → 验证

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::{core, performance, restyle, EnvVar};
use crate::error::{RestyleError, RestyleResult};
use crate::parsers::html::AttributeAllowList;
use crate::parsers::link_rewriter::{LinkRewriter, Redirector};
use crate::parsers::restorer::RestoreMode;

/// 变换配置
///
/// 所有字段都按请求显式传入核心函数，进程内没有共享的可变状态。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestyleConfig {
    /// 清理时保留的属性
    pub allowed_attributes: Vec<String>,
    /// 默认语言
    pub default_locale: String,
    /// 站点域名（请求未指定时使用）
    pub site_domain: Option<String>,
    /// 默认还原策略
    pub restore_mode: RestoreMode,
    /// 批量处理线程数
    pub worker_threads: Option<usize>,
    /// 跳转链接模式
    pub redirectors: Vec<Redirector>,
}

impl Default for RestyleConfig {
    fn default() -> Self {
        Self {
            allowed_attributes: constants::DEFAULT_ALLOWED_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_locale: constants::DEFAULT_LOCALE.to_string(),
            site_domain: None,
            restore_mode: RestoreMode::default(),
            worker_threads: None,
            redirectors: vec![Redirector::google()],
        }
    }
}

impl RestyleConfig {
    /// 验证配置
    pub fn validate(&self) -> RestyleResult<()> {
        if self.default_locale.trim().is_empty() {
            return Err(RestyleError::ConfigError("默认语言不能为空".to_string()));
        }

        if self.allowed_attributes.iter().any(|a| a.trim().is_empty()) {
            return Err(RestyleError::ConfigError("属性名不能为空".to_string()));
        }

        if let Some(domain) = &self.site_domain {
            if domain.trim().is_empty() || domain.contains('/') {
                return Err(RestyleError::ConfigError(format!(
                    "站点域名无效: '{}'",
                    domain
                )));
            }
        }

        if self.worker_threads == Some(0) {
            return Err(RestyleError::ConfigError("线程数不能为0".to_string()));
        }

        for redirector in &self.redirectors {
            if redirector.host.trim().is_empty() || redirector.param.trim().is_empty() {
                return Err(RestyleError::ConfigError(format!(
                    "跳转链接模式缺少主机或参数: {:?}",
                    redirector
                )));
            }
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        match restyle::DefaultLocale::get_optional() {
            Ok(Some(locale)) => self.default_locale = locale,
            Ok(None) => {}
            Err(e) => tracing::warn!("忽略无效环境变量: {}", e),
        }

        match restyle::SiteDomain::get_optional() {
            Ok(Some(domain)) => {
                tracing::info!("环境变量覆盖站点域名: {}", domain);
                self.site_domain = Some(domain);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("忽略无效环境变量: {}", e),
        }

        match restyle::AllowedAttributes::get_optional() {
            Ok(Some(attributes)) => self.allowed_attributes = attributes,
            Ok(None) => {}
            Err(e) => tracing::warn!("忽略无效环境变量: {}", e),
        }

        match restyle::Restore::get_optional() {
            Ok(Some(mode)) => self.restore_mode = mode,
            Ok(None) => {}
            Err(e) => tracing::warn!("忽略无效环境变量: {}", e),
        }

        match performance::WorkerThreads::get_optional() {
            Ok(Some(threads)) => self.worker_threads = Some(threads),
            Ok(None) => {}
            Err(e) => tracing::warn!("忽略无效环境变量: {}", e),
        }
    }

    /// 属性允许列表
    pub fn allow_list(&self) -> AttributeAllowList {
        AttributeAllowList::new(&self.allowed_attributes)
    }

    /// 构建链接重写器，请求中的域名优先
    pub fn link_rewriter(&self, site_domain: Option<&str>) -> RestyleResult<LinkRewriter> {
        let domain = site_domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .or_else(|| self.site_domain.as_deref())
            .ok_or_else(|| RestyleError::MissingInput("site_domain".to_string()))?;

        Ok(LinkRewriter::new(domain)
            .with_default_locale(&self.default_locale)
            .with_redirectors(self.redirectors.clone()))
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: RestyleConfig,
    source: Option<String>,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> RestyleResult<Self> {
        Self::load_dotenv();

        let (mut config, source) = match core::ConfigPath::get_optional() {
            Ok(Some(path)) => (Self::load_from_file(&path)?, Some(path)),
            Ok(None) => Self::search_config()?,
            Err(e) => return Err(RestyleError::ConfigError(e.to_string())),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config, source })
    }

    /// 从指定文件创建，同样应用环境变量覆盖
    pub fn from_path(path: &str) -> RestyleResult<Self> {
        let expanded = shellexpand::tilde(path).into_owned();
        let mut config = Self::load_from_file(&expanded)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self {
            config,
            source: Some(expanded),
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &RestyleConfig {
        &self.config
    }

    pub fn into_config(self) -> RestyleConfig {
        self.config
    }

    /// 配置来源文件
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// 按搜索路径查找配置文件
    fn search_config() -> RestyleResult<(RestyleConfig, Option<String>)> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                let config = Self::load_from_file(&expanded_path)?;
                return Ok((config, Some(expanded_path.into_owned())));
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok((RestyleConfig::default(), None))
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> RestyleResult<RestyleConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RestyleError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| RestyleError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| RestyleError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> RestyleResult<()> {
        let mut config = RestyleConfig::default();
        config.site_domain = Some("example.com".to_string());
        let content = toml::to_string_pretty(&config)?;

        std::fs::write(path, content)
            .map_err(|e| RestyleError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
