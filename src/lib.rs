//! Snaplink - an in-memory URL shortener with click analytics
//!
//! Short codes live only for the lifetime of the process. Each one carries an
//! expiry, is removed by a timer when it lapses, and records every click with
//! its referrer and an approximate location.
//!
//! # Architecture
//! - `registry`: code registry and link model
//! - `lifecycle`: expiry timers and click recording
//! - `services`: link façade, statistics, geolocation
//! - `interfaces`: interactive terminal session
//! - `config`: configuration management
//! - `system`: clock, environment capabilities, logging

pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod lifecycle;
pub mod registry;
pub mod services;
pub mod system;
pub mod utils;
