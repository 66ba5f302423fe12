//! Lifecycle tests
//!
//! Expiry timers run on paused tokio time; the manual clock is moved in step
//! so that lazy rejection and timer removal agree.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use snaplink::errors::SnaplinkError;
use snaplink::lifecycle::{LifecycleManager, SharedRegistry};
use snaplink::registry::{CodeRegistry, CreateLinkRequest, ExpiryInput};
use snaplink::services::geolocation::PlaceholderLocator;
use snaplink::system::{Clock, ManualClock, StaticReferrer};

fn setup() -> (LifecycleManager, SharedRegistry, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap());
    let registry: SharedRegistry =
        Arc::new(Mutex::new(CodeRegistry::new(Arc::new(clock.clone()))));
    let manager = LifecycleManager::new(
        Arc::clone(&registry),
        Arc::new(clock.clone()),
        Arc::new(StaticReferrer::default()),
        Arc::new(PlaceholderLocator::new("Unknown Location")),
    );
    (manager, registry, clock)
}

fn create(registry: &SharedRegistry, req: CreateLinkRequest) -> (String, chrono::DateTime<Utc>) {
    let entry = registry.lock().create(req).unwrap();
    (entry.code, entry.expires_at)
}

// =============================================================================
// Timer removal
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_removes_entry_at_expiry() {
    let (manager, registry, clock) = setup();
    let (code, expires_at) = create(&registry, CreateLinkRequest::new("https://a.com"));
    manager.schedule_expiry(&code, expires_at);

    tokio::time::sleep(StdDuration::from_secs(29 * 60)).await;
    assert!(registry.lock().contains(&code));

    clock.advance(Duration::minutes(31));
    tokio::time::sleep(StdDuration::from_secs(2 * 60)).await;

    assert!(!registry.lock().contains(&code));
    assert_eq!(manager.pending_timers(), 0);

    // 已移除的条目按不存在处理
    let err = manager.record_click(&code).await.unwrap_err();
    assert!(matches!(err, SnaplinkError::NotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn test_clicks_between_expiry_and_timer_are_rejected() {
    let (manager, registry, clock) = setup();
    let (code, expires_at) = create(
        &registry,
        CreateLinkRequest::new("https://a.com")
            .with_expiry(ExpiryInput::After(Duration::minutes(1))),
    );
    manager.schedule_expiry(&code, expires_at);

    manager.record_click(&code).await.unwrap();

    // 时钟已到期，但定时器尚未运行
    clock.set(expires_at);
    let err = manager.record_click(&code).await.unwrap_err();
    assert!(matches!(err, SnaplinkError::ExpiredLink(_)));
    assert_eq!(registry.lock().find_by_code(&code).unwrap().click_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reschedule_replaces_timer() {
    let (manager, registry, _clock) = setup();
    let (code, expires_at) = create(&registry, CreateLinkRequest::new("https://a.com"));

    manager.schedule_expiry(&code, expires_at);
    let second = manager.schedule_expiry(&code, expires_at);

    assert!(!second.is_finished());
    assert_eq!(second.code(), code);
    assert_eq!(second.expires_at(), expires_at);
    assert_eq!(manager.pending_timers(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timer_ignores_replaced_entry() {
    let (manager, registry, clock) = setup();
    let (code, expires_at) = create(
        &registry,
        CreateLinkRequest::new("https://a.com")
            .with_code("promo")
            .with_expiry(ExpiryInput::After(Duration::minutes(1))),
    );
    manager.schedule_expiry(&code, expires_at);

    // 同一短码被重新创建，旧定时器不能删掉新条目
    registry.lock().remove(&code);
    let (_, new_expiry) = create(
        &registry,
        CreateLinkRequest::new("https://b.com")
            .with_code("promo")
            .with_expiry(ExpiryInput::After(Duration::hours(2))),
    );
    assert!(new_expiry > expires_at);

    clock.advance(Duration::minutes(2));
    tokio::time::sleep(StdDuration::from_secs(120)).await;

    let registry = registry.lock();
    let entry = registry.find_by_code("promo").unwrap();
    assert_eq!(entry.long_url, "https://b.com");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_expiry_keeps_entry() {
    let (manager, registry, clock) = setup();
    let (code, expires_at) = create(&registry, CreateLinkRequest::new("https://a.com"));
    manager.schedule_expiry(&code, expires_at);

    assert!(manager.cancel_expiry(&code));
    assert!(!manager.cancel_expiry(&code));

    clock.advance(Duration::hours(1));
    tokio::time::sleep(StdDuration::from_secs(3600)).await;
    assert!(registry.lock().contains(&code));
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_timers() {
    let (manager, registry, clock) = setup();
    let (code, expires_at) = create(&registry, CreateLinkRequest::new("https://a.com"));
    manager.schedule_expiry(&code, expires_at);

    drop(manager);
    clock.advance(Duration::hours(1));
    tokio::time::sleep(StdDuration::from_secs(3600)).await;
    assert!(registry.lock().contains(&code));
}

#[tokio::test(start_paused = true)]
async fn test_click_timestamp_uses_clock() {
    let (manager, registry, clock) = setup();
    let (code, _) = create(&registry, CreateLinkRequest::new("https://a.com"));

    clock.advance(Duration::minutes(3));
    let record = manager.record_click(&code).await.unwrap().unwrap();

    assert_eq!(record.timestamp, clock.now());
    assert_eq!(record.source, "Direct");
    assert_eq!(record.location, "Unknown Location");
}
