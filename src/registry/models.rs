use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 一次点击记录，追加后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRecord {
    pub timestamp: DateTime<Utc>,
    /// 来源页面，没有时为 "Direct"
    pub source: String,
    /// 粗略地理位置
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortUrlEntry {
    pub long_url: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    clicks: Vec<ClickRecord>,
}

impl ShortUrlEntry {
    pub(crate) fn new(
        long_url: String,
        code: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            long_url,
            code,
            expires_at,
            created_at,
            clicks: Vec::new(),
        }
    }

    pub fn clicks(&self) -> &[ClickRecord] {
        &self.clicks
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }

    /// `now >= expires_at` 即视为过期
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub(crate) fn push_click(&mut self, record: ClickRecord) {
        self.clicks.push(record);
    }
}

/// 用户提交的过期设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryInput {
    /// 日历日期，按当天 23:59:59.999 结束
    Date(NaiveDate),
    /// 绝对时间点
    At(DateTime<Utc>),
    /// 相对当前时间的延迟；非正值回退到默认过期时间
    After(Duration),
}

/// Request to create a new short URL
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Destination URL (required, trimmed)
    pub long_url: String,
    /// Custom short code; blank means "generate one"
    pub code: Option<String>,
    /// Expiry; `None` uses the configured default
    pub expiry: Option<ExpiryInput>,
}

impl CreateLinkRequest {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_expiry(mut self, expiry: ExpiryInput) -> Self {
        self.expiry = Some(expiry);
        self
    }
}
