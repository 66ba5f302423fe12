//! Entry lifecycle
//!
//! - `manager`: click recording and expiry bookkeeping
//! - `timers`: cancellable one-shot expiry timers keyed by code

pub mod manager;
pub mod timers;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::registry::CodeRegistry;

pub use manager::LifecycleManager;
pub use timers::ExpiryHandle;

/// Registry shared between the session and its expiry timers
///
/// The lock is only held for synchronous sections, never across `.await`.
pub type SharedRegistry = Arc<Mutex<CodeRegistry>>;
