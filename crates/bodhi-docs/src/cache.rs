/// Rendered-document cache for the docs builder.
///
/// Key schema:
/// - `docs:v1:render:{sha256(slug|source)}`: rendered HTML
///
/// Keys hash the markdown source, so an edited document misses and is rendered again.
use sha2::{Digest, Sha256};
use tracing::debug;

use bodhi_common::cache::MemoryCache;

const KEY_PREFIX: &str = "docs:v1:";

#[derive(Default)]
pub struct RenderCache {
    inner: MemoryCache<String>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_rendered(&self, slug: &str, source: &str) -> Option<String> {
        let key = render_key(slug, source);
        let html = self.inner.get(&key)?;
        debug!(slug, "render cache hit");
        Some(html)
    }

    pub fn set_rendered(&self, slug: &str, source: &str, html: &str) {
        let key = render_key(slug, source);
        self.inner.set(&key, html.to_string());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

fn render_key(slug: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slug.as_bytes());
    hasher.update(b"|");
    hasher.update(source.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}render:{:x}", hash)
}
