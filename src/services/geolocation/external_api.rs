//! 外部地理位置 API 实现
//!
//! 请求返回 JSON 的定位接口（默认 ipapi.co），结果带短期缓存 + Singleflight，
//! 同一时间段内多次点击只发一次 HTTP。

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{GeoLocator, UNKNOWN_LOCATION};

/// 缓存 TTL（15 分钟）
const LOCATION_CACHE_TTL_SECS: u64 = 15 * 60;
/// 缓存最大容量
const LOCATION_CACHE_MAX_CAPACITY: u64 = 64;

/// 外部 API 定位器
///
/// 只缓存成功结果，失败时每次点击都会重新尝试。
pub struct ExternalApiLocator {
    api_url: String,
    agent: Agent,
    /// 接口地址 → 格式化后的位置
    cache: Cache<String, String>,
}

impl ExternalApiLocator {
    pub fn new(api_url: &str, timeout_secs: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(LOCATION_CACHE_TTL_SECS))
            .max_capacity(LOCATION_CACHE_MAX_CAPACITY)
            .build();

        Self {
            api_url: api_url.to_string(),
            agent,
            cache,
        }
    }

    /// 从 JSON 响应中提取 "城市, 地区, 国家"
    ///
    /// 接口声明失败（`"error": true` 或 `"status": "fail"`）时返回 `None`
    pub(crate) fn format_location(json: &serde_json::Value) -> Option<String> {
        if json["error"].as_bool() == Some(true) || json["status"].as_str() == Some("fail") {
            trace!("Geolocation API returned an error payload");
            return None;
        }

        let city = json["city"].as_str().unwrap_or("Unknown City");
        let region = json["region"]
            .as_str()
            .or_else(|| json["regionName"].as_str())
            .unwrap_or("");
        let country = json["country_name"]
            .as_str()
            .or_else(|| json["country"].as_str())
            .unwrap_or("Unknown Country");

        Some(format!("{}, {}, {}", city, region, country))
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn fetch_sync(agent: Agent, url: String) -> Option<String> {
        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("Geolocation request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("Geolocation response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        let location = Self::format_location(&json);
        trace!("Geolocation lookup: {:?}", location);
        location
    }

    async fn fetch(&self) -> Option<String> {
        let agent = self.agent.clone();
        let url = self.api_url.clone();

        tokio::task::spawn_blocking(move || Self::fetch_sync(agent, url))
            .await
            .unwrap_or_else(|e| {
                warn!("Geolocation spawn_blocking failed: {}", e);
                None
            })
    }
}

#[async_trait]
impl GeoLocator for ExternalApiLocator {
    async fn locate(&self) -> String {
        // optionally_get_with 自带 singleflight 语义，且不缓存 None
        self.cache
            .optionally_get_with(self.api_url.clone(), async {
                trace!("Geolocation cache miss, fetching from {}", self.api_url);
                self.fetch().await
            })
            .await
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
