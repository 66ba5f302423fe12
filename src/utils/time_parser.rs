use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::errors::{Result, SnaplinkError};
use crate::registry::ExpiryInput;

pub struct TimeParser;

impl TimeParser {
    /// 解析过期时间输入，支持多种格式：
    /// - 日期：2026-10-20（当天结束时过期）
    /// - RFC3339：2026-10-20T12:00:00Z
    /// - 分钟数：45
    /// - 相对时间：1d, 2w, 1h30m, 2d12h
    ///
    /// 空字符串返回 `None`，表示使用默认过期时间
    pub fn parse_expiry(input: &str) -> Result<Option<ExpiryInput>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Some(ExpiryInput::Date(date)));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Some(ExpiryInput::At(dt.with_timezone(&Utc))));
        }

        if let Ok(minutes) = input.parse::<i64>() {
            let duration = Duration::try_minutes(minutes).ok_or_else(|| {
                SnaplinkError::invalid_expiry(format!("Minutes out of range: '{}'", input))
            })?;
            return Ok(Some(ExpiryInput::After(duration)));
        }

        Self::parse_relative_time(input).map(|d| Some(ExpiryInput::After(d)))
    }

    fn parse_relative_time(input: &str) -> Result<Duration> {
        let mut total_duration = Duration::zero();
        let mut remaining = input;

        while !remaining.is_empty() {
            let digits_end = remaining
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(remaining.len());
            if digits_end == 0 {
                return Err(SnaplinkError::invalid_expiry(format!(
                    "Invalid time format: '{}'",
                    input
                )));
            }
            let num: i64 = remaining[..digits_end].parse().map_err(|_| {
                SnaplinkError::invalid_expiry(format!(
                    "Invalid number: '{}'",
                    &remaining[..digits_end]
                ))
            })?;
            remaining = &remaining[digits_end..];

            let unit_end = remaining
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(remaining.len());
            if unit_end == 0 {
                return Err(SnaplinkError::invalid_expiry(format!(
                    "Missing time unit after '{}'",
                    num
                )));
            }
            let unit = &remaining[..unit_end];
            remaining = &remaining[unit_end..];

            let duration = match unit.to_lowercase().as_str() {
                "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
                "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
                "h" | "hour" | "hours" => Duration::try_hours(num),
                "d" | "day" | "days" => Duration::try_days(num),
                "w" | "week" | "weeks" => Duration::try_weeks(num),
                _ => {
                    return Err(SnaplinkError::invalid_expiry(format!(
                        "Unsupported time unit: '{}'",
                        unit
                    )));
                }
            }
            .ok_or_else(|| {
                SnaplinkError::invalid_expiry(format!("Duration out of range: '{}'", input))
            })?;

            total_duration = total_duration.checked_add(&duration).ok_or_else(|| {
                SnaplinkError::invalid_expiry(format!("Duration out of range: '{}'", input))
            })?;
        }

        if total_duration == Duration::zero() {
            return Err(SnaplinkError::invalid_expiry("Duration must not be zero"));
        }

        Ok(total_duration)
    }

    /// 指定日期在 `offset` 时区内的最后一毫秒
    pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
        let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// 剩余时间，格式 "12 min 5 sec"；已过期返回 "expired"
    pub fn format_remaining(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> String {
        let remaining = expires_at.signed_duration_since(now);
        if remaining <= Duration::zero() {
            return "expired".to_string();
        }

        let total_secs = remaining.num_seconds();
        let days = total_secs / 86_400;
        let hours = (total_secs % 86_400) / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if days > 0 {
            format!("{} d {} h", days, hours)
        } else if hours > 0 {
            format!("{} h {} min", hours, minutes)
        } else {
            format!("{} min {} sec", minutes, seconds)
        }
    }
}
