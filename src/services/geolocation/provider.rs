//! 地理位置 Provider 抽象层
//!
//! 统一的查询接口，根据配置选择实现：
//! - external → ExternalApiLocator
//! - placeholder → PlaceholderLocator

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::external_api::ExternalApiLocator;
use super::placeholder::PlaceholderLocator;
use crate::config::{AnalyticsConfig, GeolocationMode};

/// 查询失败时写入的位置
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// 粗略地理位置查询
///
/// 实现不得返回错误：任何失败都退化为一个占位字符串。
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self) -> String;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一地理位置 Provider
///
/// 启动时根据配置选择实现
#[derive(Clone)]
pub struct GeoLocationProvider {
    inner: Arc<dyn GeoLocator>,
}

impl GeoLocationProvider {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let inner: Arc<dyn GeoLocator> = match config.geolocation {
            GeolocationMode::External => Arc::new(ExternalApiLocator::new(
                &config.geolocation_api_url,
                config.timeout_secs,
            )),
            GeolocationMode::Placeholder => {
                Arc::new(PlaceholderLocator::new(&config.placeholder_location))
            }
        };

        info!("Geolocation: Initialized with {} provider", inner.name());
        Self { inner }
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

#[async_trait]
impl GeoLocator for GeoLocationProvider {
    async fn locate(&self) -> String {
        self.inner.locate().await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
