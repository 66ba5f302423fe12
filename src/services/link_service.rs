//! Link management service
//!
//! The façade the presentation layer talks to. It owns the shared registry
//! and the lifecycle manager, and wires in the injected capabilities.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::analytics_service::{AnalyticsService, LinkStats, StatsSummary};
use super::geolocation::{GeoLocationProvider, GeoLocator};
use crate::config::StaticConfig;
use crate::errors::{Result, SnaplinkError};
use crate::lifecycle::{LifecycleManager, SharedRegistry};
use crate::registry::{ClickRecord, CodeRegistry, CreateLinkRequest, ShortUrlEntry};
use crate::system::{Clock, LogNavigator, Navigator, ReferrerSource, StaticReferrer, SystemClock};
use crate::utils::CodeGenerator;

// ============ Request/Response Types ============

/// A followed link: where it led and the click that was recorded
#[derive(Debug, Clone)]
pub struct OpenedLink {
    pub long_url: String,
    pub record: ClickRecord,
}

// ============ Builder ============

/// Builds a [`LinkService`] from configuration plus optional overrides
pub struct LinkServiceBuilder {
    config: StaticConfig,
    clock: Option<Arc<dyn Clock>>,
    referrer: Option<Arc<dyn ReferrerSource>>,
    navigator: Option<Arc<dyn Navigator>>,
    locator: Option<Arc<dyn GeoLocator>>,
    generator: Option<Arc<dyn CodeGenerator>>,
}

impl LinkServiceBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn referrer(mut self, referrer: Arc<dyn ReferrerSource>) -> Self {
        self.referrer = Some(referrer);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn locator(mut self, locator: Arc<dyn GeoLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn code_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> LinkService {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let referrer = self
            .referrer
            .unwrap_or_else(|| Arc::new(StaticReferrer::default()));
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));
        let locator = self
            .locator
            .unwrap_or_else(|| Arc::new(GeoLocationProvider::new(&self.config.analytics)));

        let mut registry = CodeRegistry::from_config(&self.config.shortener, Arc::clone(&clock));
        if let Some(generator) = self.generator {
            registry = registry.with_generator(generator);
        }
        let registry: SharedRegistry = Arc::new(Mutex::new(registry));

        let lifecycle =
            LifecycleManager::new(Arc::clone(&registry), Arc::clone(&clock), referrer, locator);

        LinkService {
            registry,
            lifecycle,
            navigator,
            clock,
            base_url: self.config.shortener.base_url,
        }
    }
}

// ============ LinkService Implementation ============

/// Service for short URL operations
///
/// `create` schedules a tokio timer, so it must run inside a runtime.
pub struct LinkService {
    registry: SharedRegistry,
    lifecycle: LifecycleManager,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl LinkService {
    pub fn builder(config: &StaticConfig) -> LinkServiceBuilder {
        LinkServiceBuilder {
            config: config.clone(),
            clock: None,
            referrer: None,
            navigator: None,
            locator: None,
            generator: None,
        }
    }

    /// Create a short URL and schedule its removal
    pub fn create_link(&self, req: CreateLinkRequest) -> Result<ShortUrlEntry> {
        let entry = self.registry.lock().create(req)?;
        self.lifecycle.schedule_expiry(&entry.code, entry.expires_at);
        Ok(entry)
    }

    /// Follow a short URL: record the click, then navigate to the destination
    ///
    /// Returns `Ok(None)` when the entry vanished while its location was being
    /// resolved; nothing is recorded and no navigation happens.
    pub async fn open_link(&self, code: &str) -> Result<Option<OpenedLink>> {
        let long_url = self
            .get_link(code)
            .map(|e| e.long_url)
            .ok_or_else(|| SnaplinkError::not_found(format!("Link '{}' not found", code)))?;

        let Some(record) = self.lifecycle.record_click(code).await? else {
            debug!("LinkService: '{}' removed before click completed", code);
            return Ok(None);
        };
        self.navigator.open(&long_url);
        Ok(Some(OpenedLink { long_url, record }))
    }

    pub fn get_link(&self, code: &str) -> Option<ShortUrlEntry> {
        self.registry.lock().find_by_code(code).cloned()
    }

    /// Snapshot of all entries in creation order
    pub fn list_links(&self) -> Vec<ShortUrlEntry> {
        self.registry.lock().snapshot()
    }

    pub fn short_url(&self, code: &str) -> String {
        AnalyticsService::short_url(&self.base_url, code)
    }

    pub fn get_stats(&self, code: &str) -> Result<LinkStats> {
        let entry = self
            .get_link(code)
            .ok_or_else(|| SnaplinkError::not_found(format!("Link '{}' not found", code)))?;
        Ok(AnalyticsService::link_stats(
            &entry,
            &self.base_url,
            self.clock.now(),
        ))
    }

    pub fn all_stats(&self) -> Vec<LinkStats> {
        let now = self.clock.now();
        self.list_links()
            .iter()
            .map(|e| AnalyticsService::link_stats(e, &self.base_url, now))
            .collect()
    }

    pub fn summary(&self) -> StatsSummary {
        AnalyticsService::summary(&self.list_links(), self.clock.now())
    }

    pub fn pending_timers(&self) -> usize {
        self.lifecycle.pending_timers()
    }

    /// Cancel every pending expiry timer
    pub fn shutdown(&self) {
        let cancelled = self.lifecycle.shutdown();
        info!(
            "LinkService: shut down with {} link(s), {} timer(s) cancelled",
            self.registry.lock().len(),
            cancelled
        );
    }
}
