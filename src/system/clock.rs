//! Time source
//!
//! Every "now" in the crate goes through [`Clock`] so tests and simulations
//! can move time explicitly.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Local, Offset, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Offset used when a calendar date has to become an instant
    fn local_offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手动推进的时钟，用于测试与模拟
///
/// 克隆后共享同一时间点。
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// 以当前系统时间为起点
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    /// 固定为 UTC，保证日期换算可复现
    fn local_offset(&self) -> FixedOffset {
        Utc.fix()
    }
}
