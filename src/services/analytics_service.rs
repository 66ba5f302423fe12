//! Analytics service layer
//!
//! Aggregates click records from registry snapshots into the views the
//! session renders. Everything here is a pure function of the snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::{ClickRecord, ShortUrlEntry};
use crate::utils::TimeParser;

// ============ 公共类型定义 ============

/// 来源统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferrerStats {
    pub referrer: String,
    pub count: u64,
    pub percentage: f64,
}

/// 地理位置统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationStats {
    pub location: String,
    pub count: u64,
}

/// 单链接统计
#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
    /// "12 min 5 sec" 形式的剩余时间
    pub remaining: String,
    pub total_clicks: usize,
    pub clicks: Vec<ClickRecord>,
    pub top_referrers: Vec<ReferrerStats>,
    pub locations: Vec<LocationStats>,
}

/// 全局汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_links: usize,
    pub active_links: usize,
    pub total_clicks: usize,
}

// ============ AnalyticsService Implementation ============

pub struct AnalyticsService;

impl AnalyticsService {
    /// 拼接展示用短链接
    pub fn short_url(base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    pub fn link_stats(entry: &ShortUrlEntry, base_url: &str, now: DateTime<Utc>) -> LinkStats {
        LinkStats {
            code: entry.code.clone(),
            long_url: entry.long_url.clone(),
            short_url: Self::short_url(base_url, &entry.code),
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            expired: entry.is_expired_at(now),
            remaining: TimeParser::format_remaining(now, entry.expires_at),
            total_clicks: entry.click_count(),
            clicks: entry.clicks().to_vec(),
            top_referrers: Self::top_referrers(entry.clicks()),
            locations: Self::location_distribution(entry.clicks()),
        }
    }

    pub fn summary(entries: &[ShortUrlEntry], now: DateTime<Utc>) -> StatsSummary {
        StatsSummary {
            total_links: entries.len(),
            active_links: entries.iter().filter(|e| !e.is_expired_at(now)).count(),
            total_clicks: entries.iter().map(ShortUrlEntry::click_count).sum(),
        }
    }

    /// 按次数降序，次数相同按名称排序
    pub fn top_referrers(clicks: &[ClickRecord]) -> Vec<ReferrerStats> {
        let total = clicks.len() as f64;
        Self::count_by(clicks, |c| c.source.as_str())
            .into_iter()
            .map(|(referrer, count)| ReferrerStats {
                referrer,
                count,
                percentage: if total > 0.0 {
                    (count as f64 / total * 1000.0).round() / 10.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    pub fn location_distribution(clicks: &[ClickRecord]) -> Vec<LocationStats> {
        Self::count_by(clicks, |c| c.location.as_str())
            .into_iter()
            .map(|(location, count)| LocationStats { location, count })
            .collect()
    }

    fn count_by<'a>(
        clicks: &'a [ClickRecord],
        key: impl Fn(&'a ClickRecord) -> &'a str,
    ) -> Vec<(String, u64)> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for click in clicks {
            *counts.entry(key(click)).or_insert(0) += 1;
        }

        let mut sorted: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted
    }
}
