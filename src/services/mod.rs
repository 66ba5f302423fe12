//! Service layer for business logic
//!
//! This module provides the logic the terminal session drives: link
//! creation and clicks, statistics, and click geolocation.

mod analytics_service;
pub mod geolocation;
mod link_service;

pub use analytics_service::*;
pub use geolocation::{GeoLocationProvider, GeoLocator};
pub use link_service::*;
