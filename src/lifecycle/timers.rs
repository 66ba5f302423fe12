//! 过期定时器
//!
//! 每个短码最多一个一次性定时器，到期后把条目从注册表移除。
//! 定时器是可取消的 tokio 任务；持有者销毁前必须调用 `cancel_all`。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::{debug, info, trace};

use super::SharedRegistry;
use crate::system::Clock;

/// 已调度的过期定时器句柄
#[derive(Debug, Clone)]
pub struct ExpiryHandle {
    code: String,
    expires_at: DateTime<Utc>,
    abort: AbortHandle,
}

impl ExpiryHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// 取消定时器；已触发的定时器不受影响
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// 已触发或已取消
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

pub(crate) struct ExpiryScheduler {
    registry: SharedRegistry,
    clock: Arc<dyn Clock>,
    timers: DashMap<String, ExpiryHandle>,
}

impl ExpiryScheduler {
    pub(crate) fn new(registry: SharedRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            timers: DashMap::new(),
        }
    }

    /// 调度过期移除；同一短码已有的定时器会被替换
    ///
    /// 必须在 tokio 运行时内调用
    pub(crate) fn schedule(&self, code: &str, expires_at: DateTime<Utc>) -> ExpiryHandle {
        let delay = expires_at
            .signed_duration_since(self.clock.now())
            .to_std()
            .unwrap_or_default();

        let registry = Arc::clone(&self.registry);
        let task_code = code.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // 只移除为之调度的那个条目
            let removed = {
                let mut registry = registry.lock();
                let matches = registry
                    .find_by_code(&task_code)
                    .is_some_and(|e| e.expires_at == expires_at);
                if matches {
                    registry.remove(&task_code)
                } else {
                    None
                }
            };

            match removed {
                Some(entry) => info!(
                    "Expiry: removed '{}' after {} click(s)",
                    entry.code,
                    entry.click_count()
                ),
                None => trace!("Expiry: '{}' already gone, nothing to remove", task_code),
            }
        });

        let handle = ExpiryHandle {
            code: code.to_string(),
            expires_at,
            abort: task.abort_handle(),
        };

        self.timers.retain(|_, h| !h.is_finished());
        if let Some(previous) = self.timers.insert(code.to_string(), handle.clone()) {
            previous.cancel();
            debug!("Expiry: replaced pending timer for '{}'", code);
        }

        debug!(
            "Expiry: scheduled '{}' in {:?} (at {})",
            code,
            delay,
            expires_at.to_rfc3339()
        );
        handle
    }

    /// 取消指定短码的定时器，返回是否存在未触发的定时器
    pub(crate) fn cancel(&self, code: &str) -> bool {
        match self.timers.remove(code) {
            Some((_, handle)) => {
                let pending = !handle.is_finished();
                handle.cancel();
                pending
            }
            None => false,
        }
    }

    /// 取消所有定时器，返回被取消的未触发数量
    pub(crate) fn cancel_all(&self) -> usize {
        let codes: Vec<String> = self.timers.iter().map(|r| r.key().clone()).collect();
        codes.iter().filter(|code| self.cancel(code)).count()
    }

    pub(crate) fn pending(&self) -> usize {
        self.timers.iter().filter(|h| !h.is_finished()).count()
    }
}
