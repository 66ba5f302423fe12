//! User interfaces
//!
//! - `session`: interactive terminal session

pub mod session;
