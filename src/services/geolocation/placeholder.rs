use async_trait::async_trait;

use super::provider::GeoLocator;

/// 固定位置，不发起任何请求
pub struct PlaceholderLocator {
    location: String,
}

impl PlaceholderLocator {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
        }
    }
}

#[async_trait]
impl GeoLocator for PlaceholderLocator {
    async fn locate(&self) -> String {
        self.location.clone()
    }

    fn name(&self) -> &'static str {
        "Placeholder"
    }
}
