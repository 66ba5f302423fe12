//! 点击地理位置服务
//!
//! 提供粗略位置查询，支持：
//! - 外部 JSON 接口（默认 ipapi.co）
//! - 固定占位字符串

mod external_api;
mod placeholder;
mod provider;

pub use external_api::ExternalApiLocator;
pub use placeholder::PlaceholderLocator;
pub use provider::{GeoLocationProvider, GeoLocator, UNKNOWN_LOCATION};
