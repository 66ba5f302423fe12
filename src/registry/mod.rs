//! Code registry
//!
//! Owns the list of short URL entries in creation order. All mutation goes
//! through [`CodeRegistry`]: `create` validates and appends, the lifecycle
//! manager appends clicks and removes expired entries.

mod models;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, trace, warn};

use crate::config::ShortenerConfig;
use crate::errors::{Result, SnaplinkError};
use crate::system::Clock;
use crate::utils::{CodeGenerator, RandomCodeGenerator, TimeParser};

pub use models::{ClickRecord, CreateLinkRequest, ExpiryInput, ShortUrlEntry};

/// 默认过期时间（分钟）
pub const DEFAULT_EXPIRY_MINUTES: i64 = 30;

/// 随机短码连续冲突的上限，超过即认为短码空间已耗尽
pub const MAX_GENERATE_ATTEMPTS: usize = 1_000;

pub struct CodeRegistry {
    entries: Vec<ShortUrlEntry>,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn CodeGenerator>,
    default_expiry: Duration,
}

impl CodeRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Vec::new(),
            clock,
            generator: Arc::new(RandomCodeGenerator::default()),
            default_expiry: Duration::minutes(DEFAULT_EXPIRY_MINUTES),
        }
    }

    pub fn from_config(config: &ShortenerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(clock)
            .with_generator(Arc::new(RandomCodeGenerator::new(config.code_length)))
            .with_default_expiry(
                Duration::try_minutes(config.default_expiry_minutes)
                    .unwrap_or_else(|| Duration::minutes(DEFAULT_EXPIRY_MINUTES)),
            )
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_default_expiry(mut self, default_expiry: Duration) -> Self {
        self.default_expiry = default_expiry;
        self
    }

    /// Create a new short URL entry
    ///
    /// Nothing is mutated when validation fails.
    pub fn create(&mut self, req: CreateLinkRequest) -> Result<ShortUrlEntry> {
        let long_url = req.long_url.trim();
        if long_url.is_empty() {
            return Err(SnaplinkError::empty_long_url("Long URL is required."));
        }

        let custom_code = req
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if let Some(code) = custom_code
            && self.contains(code)
        {
            return Err(SnaplinkError::code_taken(format!(
                "Short code '{}' already exists. Please choose another.",
                code
            )));
        }

        let now = self.clock.now();
        let expires_at = self.resolve_expiry(now, req.expiry)?;

        let code = match custom_code {
            Some(code) => code.to_string(),
            None => self.generate_unique_code()?,
        };

        let entry = ShortUrlEntry::new(long_url.to_string(), code, now, expires_at);
        self.entries.push(entry.clone());

        info!(
            "Registry: created '{}' -> '{}' (expires {})",
            entry.code,
            entry.long_url,
            entry.expires_at.to_rfc3339()
        );
        Ok(entry)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&ShortUrlEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find_by_code(code).is_some()
    }

    /// Remove an entry, returning it if it was present
    pub fn remove(&mut self, code: &str) -> Option<ShortUrlEntry> {
        let index = self.entries.iter().position(|e| e.code == code)?;
        let removed = self.entries.remove(index);
        debug!("Registry: removed '{}'", code);
        Some(removed)
    }

    /// Entries in creation order
    pub fn entries(&self) -> &[ShortUrlEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<ShortUrlEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加点击记录
    ///
    /// 只追加到 `created_at` 与 `expires_at` 都一致的那个条目；
    /// 条目已被移除或同名短码已被重新创建时返回 false
    pub(crate) fn append_click(
        &mut self,
        code: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        record: ClickRecord,
    ) -> bool {
        let target = self.entries.iter_mut().find(|e| {
            e.code == code && e.created_at == created_at && e.expires_at == expires_at
        });
        match target {
            Some(entry) => {
                entry.push_click(record);
                true
            }
            None => false,
        }
    }

    fn resolve_expiry(
        &self,
        now: DateTime<Utc>,
        input: Option<ExpiryInput>,
    ) -> Result<DateTime<Utc>> {
        let expires_at = match input {
            Some(ExpiryInput::Date(date)) => {
                let end_of_day = TimeParser::end_of_day(date, self.clock.local_offset())
                    .ok_or_else(|| {
                        SnaplinkError::invalid_expiry(format!("Cannot resolve date {}", date))
                    })?;
                Self::ensure_future(now, end_of_day)?
            }
            Some(ExpiryInput::At(at)) => Self::ensure_future(now, at)?,
            Some(ExpiryInput::After(delay)) if delay > Duration::zero() => now
                .checked_add_signed(delay)
                .ok_or_else(|| SnaplinkError::invalid_expiry("Expiry is out of range"))?,
            // 未设置或非正值时使用默认过期时间
            _ => now
                .checked_add_signed(self.default_expiry)
                .ok_or_else(|| SnaplinkError::invalid_expiry("Default expiry is out of range"))?,
        };
        Ok(expires_at)
    }

    fn ensure_future(now: DateTime<Utc>, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if at <= now {
            return Err(SnaplinkError::expiry_in_past(
                "Expiry date must be in the future",
            ));
        }
        Ok(at)
    }

    fn generate_unique_code(&self) -> Result<String> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let candidate = self.generator.generate();
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
            trace!("Registry: generated code '{}' collides, retrying", candidate);
        }

        warn!(
            "Registry: no free code after {} attempts ({} entries held)",
            MAX_GENERATE_ATTEMPTS,
            self.entries.len()
        );
        Err(SnaplinkError::code_space_exhausted(
            "Could not generate a free short code. Try a custom code.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::ManualClock;
    use chrono::{NaiveDate, TimeZone};
    use parking_lot::Mutex;

    /// 按顺序返回预设短码
    struct SequenceGenerator {
        codes: Mutex<Vec<String>>,
    }

    impl SequenceGenerator {
        fn new(codes: &[&str]) -> Self {
            let mut codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
            codes.reverse();
            Self {
                codes: Mutex::new(codes),
            }
        }
    }

    impl CodeGenerator for SequenceGenerator {
        fn generate(&self) -> String {
            self.codes.lock().pop().expect("sequence exhausted")
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
    }

    fn registry() -> (CodeRegistry, ManualClock) {
        let clock = ManualClock::new(start());
        (CodeRegistry::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_create_with_defaults() {
        let (mut registry, _clock) = registry();
        let entry = registry
            .create(CreateLinkRequest::new("  https://a.com  "))
            .unwrap();

        assert_eq!(entry.long_url, "https://a.com");
        assert_eq!(entry.code.len(), 6);
        assert_eq!(entry.click_count(), 0);
        assert_eq!(entry.created_at, start());
        assert_eq!(entry.expires_at, start() + Duration::minutes(30));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_long_url_rejected() {
        let (mut registry, _clock) = registry();
        for url in ["", "   ", "\t\n"] {
            let err = registry.create(CreateLinkRequest::new(url)).unwrap_err();
            assert!(matches!(err, SnaplinkError::EmptyLongUrl(_)));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_generation_retries_on_collision() {
        let (registry, _clock) = registry();
        let mut registry = registry.with_generator(Arc::new(SequenceGenerator::new(&[
            "AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB",
        ])));

        let first = registry.create(CreateLinkRequest::new("https://a.com")).unwrap();
        let second = registry.create(CreateLinkRequest::new("https://b.com")).unwrap();

        assert_eq!(first.code, "AAAAAA");
        assert_eq!(second.code, "BBBBBB");
    }

    #[test]
    fn test_generated_code_avoids_custom_codes() {
        let (registry, _clock) = registry();
        let mut registry = registry
            .with_generator(Arc::new(SequenceGenerator::new(&["mine01", "gen002"])));

        registry
            .create(CreateLinkRequest::new("https://a.com").with_code("mine01"))
            .unwrap();
        let generated = registry.create(CreateLinkRequest::new("https://b.com")).unwrap();

        assert_eq!(generated.code, "gen002");
    }

    #[test]
    fn test_blank_custom_code_is_generated() {
        let (mut registry, _clock) = registry();
        let entry = registry
            .create(CreateLinkRequest::new("https://a.com").with_code("   "))
            .unwrap();
        assert_eq!(entry.code.len(), 6);
    }

    #[test]
    fn test_custom_code_is_trimmed() {
        let (mut registry, _clock) = registry();
        let entry = registry
            .create(CreateLinkRequest::new("https://a.com").with_code(" promo "))
            .unwrap();
        assert_eq!(entry.code, "promo");

        let err = registry
            .create(CreateLinkRequest::new("https://b.com").with_code("promo"))
            .unwrap_err();
        assert!(matches!(err, SnaplinkError::CodeTaken(_)));
    }

    #[test]
    fn test_date_expiry_is_end_of_day() {
        let (mut registry, _clock) = registry();
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let entry = registry
            .create(CreateLinkRequest::new("https://a.com").with_expiry(ExpiryInput::Date(date)))
            .unwrap();

        assert_eq!(entry.expires_at.to_rfc3339(), "2026-10-20T23:59:59.999+00:00");
    }

    #[test]
    fn test_today_is_still_in_the_future() {
        let (mut registry, _clock) = registry();
        let today = start().date_naive();
        let entry = registry
            .create(CreateLinkRequest::new("https://a.com").with_expiry(ExpiryInput::Date(today)))
            .unwrap();
        assert!(entry.expires_at > start());
    }

    #[test]
    fn test_past_date_rejected() {
        let (mut registry, _clock) = registry();
        let yesterday = start().date_naive().pred_opt().unwrap();
        let err = registry
            .create(
                CreateLinkRequest::new("https://a.com").with_expiry(ExpiryInput::Date(yesterday)),
            )
            .unwrap_err();

        assert!(matches!(err, SnaplinkError::ExpiryInPast(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_absolute_expiry_must_be_strictly_future() {
        let (mut registry, _clock) = registry();
        let err = registry
            .create(CreateLinkRequest::new("https://a.com").with_expiry(ExpiryInput::At(start())))
            .unwrap_err();
        assert!(matches!(err, SnaplinkError::ExpiryInPast(_)));
    }

    #[test]
    fn test_non_positive_delay_falls_back_to_default() {
        let (mut registry, _clock) = registry();
        let entry = registry
            .create(
                CreateLinkRequest::new("https://a.com")
                    .with_expiry(ExpiryInput::After(Duration::minutes(-10))),
            )
            .unwrap();
        assert_eq!(entry.expires_at, start() + Duration::minutes(30));

        let entry = registry
            .create(
                CreateLinkRequest::new("https://b.com")
                    .with_expiry(ExpiryInput::After(Duration::minutes(5))),
            )
            .unwrap();
        assert_eq!(entry.expires_at, start() + Duration::minutes(5));
    }

    #[test]
    fn test_remove_and_order() {
        let (mut registry, _clock) = registry();
        for (url, code) in [("https://a.com", "a"), ("https://b.com", "b"), ("https://c.com", "c")] {
            registry
                .create(CreateLinkRequest::new(url).with_code(code))
                .unwrap();
        }

        assert_eq!(registry.remove("b").map(|e| e.long_url), Some("https://b.com".to_string()));
        assert!(registry.remove("b").is_none());

        let codes: Vec<&str> = registry.entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "c"]);
    }

    fn direct_click() -> ClickRecord {
        ClickRecord {
            timestamp: start(),
            source: "Direct".to_string(),
            location: "Unknown Location".to_string(),
        }
    }

    #[test]
    fn test_append_click_to_missing_code() {
        let (mut registry, _clock) = registry();
        assert!(!registry.append_click("nope", start(), start(), direct_click()));
    }

    #[test]
    fn test_append_click_skips_recreated_code() {
        let (mut registry, _clock) = registry();
        let old = registry
            .create(CreateLinkRequest::new("https://a.com").with_code("promo"))
            .unwrap();
        registry.remove("promo");
        registry
            .create(
                CreateLinkRequest::new("https://b.com")
                    .with_code("promo")
                    .with_expiry(ExpiryInput::After(Duration::hours(2))),
            )
            .unwrap();

        assert!(!registry.append_click("promo", old.created_at, old.expires_at, direct_click()));
        assert_eq!(registry.find_by_code("promo").unwrap().click_count(), 0);
    }

    /// 始终返回同一个短码
    struct ConstantGenerator;

    impl CodeGenerator for ConstantGenerator {
        fn generate(&self) -> String {
            "AAAA".to_string()
        }
    }

    #[test]
    fn test_exhausted_code_space_returns_error() {
        let (registry, _clock) = registry();
        let mut registry = registry.with_generator(Arc::new(ConstantGenerator));

        registry.create(CreateLinkRequest::new("https://a.com")).unwrap();
        let err = registry
            .create(CreateLinkRequest::new("https://b.com"))
            .unwrap_err();

        assert!(matches!(err, SnaplinkError::CodeSpaceExhausted(_)));
        assert_eq!(registry.len(), 1);

        // 自定义短码不受影响
        registry
            .create(CreateLinkRequest::new("https://b.com").with_code("mine"))
            .unwrap();
    }

    #[test]
    fn test_out_of_range_default_expiry_is_an_error() {
        let (registry, _clock) = registry();
        let mut registry = registry.with_default_expiry(Duration::weeks(1_000_000_000));

        let err = registry
            .create(CreateLinkRequest::new("https://a.com"))
            .unwrap_err();

        assert!(matches!(err, SnaplinkError::InvalidExpiry(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_config_with_huge_default_expiry_does_not_panic() {
        let config = ShortenerConfig {
            default_expiry_minutes: 1_000_000_000_000,
            ..ShortenerConfig::default()
        };
        let mut registry = CodeRegistry::from_config(&config, Arc::new(ManualClock::new(start())));

        assert!(matches!(
            registry.create(CreateLinkRequest::new("https://a.com")),
            Err(SnaplinkError::InvalidExpiry(_))
        ));
    }
}
