//! Referrer and navigation capabilities
//!
//! The session injects these instead of reading ambient globals.

use parking_lot::RwLock;
use tracing::info;

/// Source label stored when no referrer is known
pub const DIRECT_SOURCE: &str = "Direct";

pub trait ReferrerSource: Send + Sync {
    /// Current referrer, `None` for direct visits
    fn referrer(&self) -> Option<String>;
}

/// 可替换的固定来源
#[derive(Debug, Default)]
pub struct StaticReferrer {
    value: RwLock<Option<String>>,
}

impl StaticReferrer {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value: RwLock::new(normalize(value)),
        }
    }

    pub fn set(&self, value: Option<String>) {
        *self.value.write() = normalize(value);
    }
}

impl ReferrerSource for StaticReferrer {
    fn referrer(&self) -> Option<String> {
        self.value.read().clone()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Label recorded on a click
pub fn source_label(source: &dyn ReferrerSource) -> String {
    source
        .referrer()
        .unwrap_or_else(|| DIRECT_SOURCE.to_string())
}

pub trait Navigator: Send + Sync {
    /// Open `url` in a new context
    fn open(&self, url: &str);
}

/// Logs the destination instead of launching anything
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open(&self, url: &str) {
        info!("Navigating to {}", url);
    }
}
