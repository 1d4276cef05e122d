//! Where the router gets its content from.

use async_trait::async_trait;
use contour_core::PathResponse;
use contour_delivery::{DeliveryClient, DeliveryError};

/// Resolves routed paths to content.
///
/// `Ok(None)` means the path has no content and ends in the not-found
/// state.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn content_by_path(&self, path: &str) -> Result<Option<PathResponse>, DeliveryError>;
}

#[async_trait]
impl ContentSource for DeliveryClient {
    async fn content_by_path(&self, path: &str) -> Result<Option<PathResponse>, DeliveryError> {
        self.fetch_by_path(path).await.map(Some)
    }
}
