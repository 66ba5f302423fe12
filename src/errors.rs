use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnaplinkError {
    EmptyLongUrl(String),
    CodeTaken(String),
    ExpiryInPast(String),
    ExpiredLink(String),
    NotFound(String),
    InvalidExpiry(String),
    Config(String),
    CodeSpaceExhausted(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::EmptyLongUrl(_) => "E001",
            SnaplinkError::CodeTaken(_) => "E002",
            SnaplinkError::ExpiryInPast(_) => "E003",
            SnaplinkError::ExpiredLink(_) => "E004",
            SnaplinkError::NotFound(_) => "E005",
            SnaplinkError::InvalidExpiry(_) => "E006",
            SnaplinkError::Config(_) => "E007",
            SnaplinkError::CodeSpaceExhausted(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::EmptyLongUrl(_) => "Long URL Required",
            SnaplinkError::CodeTaken(_) => "Short Code Taken",
            SnaplinkError::ExpiryInPast(_) => "Expiry In Past",
            SnaplinkError::ExpiredLink(_) => "Link Expired",
            SnaplinkError::NotFound(_) => "Link Not Found",
            SnaplinkError::InvalidExpiry(_) => "Invalid Expiry",
            SnaplinkError::Config(_) => "Configuration Error",
            SnaplinkError::CodeSpaceExhausted(_) => "Code Space Exhausted",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnaplinkError::EmptyLongUrl(msg)
            | SnaplinkError::CodeTaken(msg)
            | SnaplinkError::ExpiryInPast(msg)
            | SnaplinkError::ExpiredLink(msg)
            | SnaplinkError::NotFound(msg)
            | SnaplinkError::InvalidExpiry(msg)
            | SnaplinkError::Config(msg)
            | SnaplinkError::CodeSpaceExhausted(msg) => msg,
        }
    }

    /// 用户可恢复的错误（表单内联提示，不终止会话）
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SnaplinkError::Config(_))
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

// 便捷的构造函数
impl SnaplinkError {
    pub fn empty_long_url<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::EmptyLongUrl(msg.into())
    }

    pub fn code_taken<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::CodeTaken(msg.into())
    }

    pub fn expiry_in_past<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::ExpiryInPast(msg.into())
    }

    pub fn expired_link<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::ExpiredLink(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::NotFound(msg.into())
    }

    pub fn invalid_expiry<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::InvalidExpiry(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::CodeSpaceExhausted(msg.into())
    }
}

impl From<config::ConfigError> for SnaplinkError {
    fn from(err: config::ConfigError) -> Self {
        SnaplinkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SnaplinkError {
    fn from(err: toml::ser::Error) -> Self {
        SnaplinkError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SnaplinkError {
    fn from(err: std::io::Error) -> Self {
        SnaplinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;
