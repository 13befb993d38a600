//! `Location` header construction.

use url::Url;

use crate::store::ListId;

/// Builds absolute resource URLs under the configured public base URL.
#[derive(Debug, Clone)]
pub struct Locator {
    base: Url,
}

impl Locator {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// `{base}/shoppinglists/{id}`
    pub fn list(&self, id: ListId) -> String {
        self.resource(&["shoppinglists", &id.to_string()])
    }

    /// `{base}/shoppinglists/{id}/{name}`, with the name percent-encoded.
    pub fn item(&self, id: ListId, name: &str) -> String {
        self.resource(&["shoppinglists", &id.to_string(), name])
    }

    fn resource(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }
}
