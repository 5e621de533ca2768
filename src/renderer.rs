//! Optional rendered-page fetching.
//!
//! Some listing pages only populate their product grid from JavaScript. A
//! `PageRenderer` turns such a URL into post-render HTML. The resolver
//! consults one only when it is provided; nothing in the core pipeline
//! depends on a rendering engine being available.

use async_trait::async_trait;

use crate::scrapers::FetchError;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Fetch a URL and return its HTML after scripts have run.
    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError>;
}
