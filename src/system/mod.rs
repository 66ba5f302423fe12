//! System capabilities and process-level setup
//!
//! - `clock`: injected time source
//! - `environment`: referrer source and navigator
//! - `logging`: tracing subscriber initialization

pub mod clock;
pub mod environment;
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
pub use environment::{
    DIRECT_SOURCE, LogNavigator, Navigator, ReferrerSource, StaticReferrer, source_label,
};
pub use logging::init_logging;
