use serde::{Deserialize, Serialize};

use crate::errors::{Result, SnaplinkError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "snaplink.toml";

/// 随机短码最小长度，62^4 个候选
pub const MIN_CODE_LENGTH: usize = 4;

/// 默认过期时间上限：十年（分钟）
pub const MAX_DEFAULT_EXPIRY_MINUTES: i64 = 60 * 24 * 365 * 10;

/// 地理位置解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    /// 请求外部 JSON 接口
    #[default]
    External,
    /// 固定占位字符串，不发起网络请求
    Placeholder,
}

impl std::fmt::Display for GeolocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

impl std::str::FromStr for GeolocationMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "external" => Ok(Self::External),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(format!(
                "Invalid geolocation mode: '{}'. Valid: external, placeholder",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - shortener: 短码长度、默认过期时间、展示用前缀
/// - analytics: 点击地理位置解析
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub shortener: ShortenerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SHORTENER__CODE_LENGTH=8
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 SL，分隔符 __
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<()> {
        if self.shortener.code_length < MIN_CODE_LENGTH {
            return Err(SnaplinkError::config(format!(
                "shortener.code_length must be >= {}",
                MIN_CODE_LENGTH
            )));
        }
        if self.shortener.default_expiry_minutes <= 0 {
            return Err(SnaplinkError::config(
                "shortener.default_expiry_minutes must be > 0",
            ));
        }
        if self.shortener.default_expiry_minutes > MAX_DEFAULT_EXPIRY_MINUTES {
            return Err(SnaplinkError::config(format!(
                "shortener.default_expiry_minutes must be <= {}",
                MAX_DEFAULT_EXPIRY_MINUTES
            )));
        }
        if self.analytics.timeout_secs == 0 {
            return Err(SnaplinkError::config("analytics.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 短码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_expiry_minutes")]
    pub default_expiry_minutes: i64,
    /// 展示用前缀，仅用于拼接短链接文本
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// 分析统计配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub geolocation: GeolocationMode,
    /// 外部地理位置接口，返回 city / region / country_name 字段
    #[serde(default = "default_geolocation_api_url")]
    pub geolocation_api_url: String,
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_secs: u64,
    /// placeholder 模式下写入的固定值
    #[serde(default = "default_placeholder_location")]
    pub placeholder_location: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_code_length() -> usize {
    6
}

fn default_expiry_minutes() -> i64 {
    30
}

fn default_base_url() -> String {
    "https://short.url/".to_string()
}

fn default_geolocation_api_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_geolocation_timeout() -> u64 {
    2
}

fn default_placeholder_location() -> String {
    "Unknown Location".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            default_expiry_minutes: default_expiry_minutes(),
            base_url: default_base_url(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            geolocation: GeolocationMode::default(),
            geolocation_api_url: default_geolocation_api_url(),
            timeout_secs: default_geolocation_timeout(),
            placeholder_location: default_placeholder_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
