//! 条目生命周期管理器
//!
//! 负责：
//! - 记录点击（过期检查 + 来源 + 粗略位置）
//! - 调度过期移除
//! - 销毁前取消所有定时器

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::SharedRegistry;
use super::timers::{ExpiryHandle, ExpiryScheduler};
use crate::errors::{Result, SnaplinkError};
use crate::registry::ClickRecord;
use crate::services::geolocation::GeoLocator;
use crate::system::{Clock, ReferrerSource, source_label};

pub struct LifecycleManager {
    registry: SharedRegistry,
    clock: Arc<dyn Clock>,
    referrer: Arc<dyn ReferrerSource>,
    locator: Arc<dyn GeoLocator>,
    scheduler: ExpiryScheduler,
}

impl LifecycleManager {
    pub fn new(
        registry: SharedRegistry,
        clock: Arc<dyn Clock>,
        referrer: Arc<dyn ReferrerSource>,
        locator: Arc<dyn GeoLocator>,
    ) -> Self {
        let scheduler = ExpiryScheduler::new(Arc::clone(&registry), Arc::clone(&clock));
        Self {
            registry,
            clock,
            referrer,
            locator,
            scheduler,
        }
    }

    /// 记录一次点击
    ///
    /// - 条目不存在：`NotFound`
    /// - 已过期：`ExpiredLink`，条目保留，不追加记录
    /// - 位置查询期间条目被移除（或同名短码被重新创建）：返回 `Ok(None)`，不追加
    pub async fn record_click(&self, code: &str) -> Result<Option<ClickRecord>> {
        let now = self.clock.now();
        let (created_at, expires_at) = {
            let registry = self.registry.lock();
            let entry = registry
                .find_by_code(code)
                .ok_or_else(|| SnaplinkError::not_found(format!("Link '{}' not found", code)))?;
            if entry.is_expired_at(now) {
                debug!("Lifecycle: rejected click on expired '{}'", code);
                return Err(SnaplinkError::expired_link("This link has expired"));
            }
            (entry.created_at, entry.expires_at)
        };

        let source = source_label(self.referrer.as_ref());
        // 锁外等待位置查询
        let location = self.locator.locate().await;

        let record = ClickRecord {
            timestamp: now,
            source,
            location,
        };

        let appended =
            self.registry
                .lock()
                .append_click(code, created_at, expires_at, record.clone());
        if !appended {
            warn!(
                "Lifecycle: '{}' disappeared during location lookup, click dropped",
                code
            );
            return Ok(None);
        }

        info!(
            "Lifecycle: click on '{}' from {} ({})",
            code, record.source, record.location
        );
        Ok(Some(record))
    }

    /// 调度过期移除；必须在 tokio 运行时内调用
    pub fn schedule_expiry(&self, code: &str, expires_at: DateTime<Utc>) -> ExpiryHandle {
        self.scheduler.schedule(code, expires_at)
    }

    pub fn cancel_expiry(&self, code: &str) -> bool {
        self.scheduler.cancel(code)
    }

    /// 尚未触发的定时器数量
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// 取消所有定时器
    pub fn shutdown(&self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            info!("Lifecycle: cancelled {} pending expiry timer(s)", cancelled);
        }
        cancelled
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
