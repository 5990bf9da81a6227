use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use base64::Engine as _;
use futures::future::{BoxFuture, FutureExt};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{PosterError, PosterResult};

/// Turns a source reference into a decoded image.
///
/// Sources are remote URLs, file paths, or inline `data:` payloads. Implementations must be
/// able to answer already-loaded sources without fetching them again.
pub trait ResourceLoader: Send + Sync {
    /// Load and decode `source`, failing with [`PosterError::Load`].
    fn load<'a>(&'a self, source: &'a str) -> BoxFuture<'a, PosterResult<DecodedImage>>;
}

/// Loader for `data:` URLs, filesystem paths and (with the `http` feature) `http(s)` URLs.
///
/// Decoded images are cached by source string and never evicted; long-lived loaders should
/// call [`DefaultLoader::clear_cache`] between unrelated batches.
pub struct DefaultLoader {
    root: PathBuf,
    cache: Mutex<HashMap<String, DecodedImage>>,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl DefaultLoader {
    /// Create a loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
            #[cfg(feature = "http")]
            client: reqwest::Client::new(),
        }
    }

    /// Seed the cache with an image that is already in memory.
    pub fn insert(&self, source: impl Into<String>, image: DecodedImage) {
        self.lock_cache().insert(source.into(), image);
    }

    /// Return the cached image for `source`, if it was loaded before.
    pub fn cached(&self, source: &str) -> Option<DecodedImage> {
        self.lock_cache().get(source).cloned()
    }

    /// Drop every cached image.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, DecodedImage>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn fetch_bytes(&self, source: &str) -> Result<Vec<u8>, String> {
        if source.starts_with("data:") {
            return decode_data_url(source);
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return self.fetch_http(source).await;
        }
        let path = self.root.join(source);
        tokio::fs::read(&path)
            .await
            .map_err(|e| format!("failed to read '{}': {e}", path.display()))
    }

    #[cfg(feature = "http")]
    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;
        let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_http(&self, _url: &str) -> Result<Vec<u8>, String> {
        Err("http sources require the `http` feature".to_owned())
    }
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ResourceLoader for DefaultLoader {
    fn load<'a>(&'a self, source: &'a str) -> BoxFuture<'a, PosterResult<DecodedImage>> {
        async move {
            if let Some(hit) = self.cached(source) {
                tracing::trace!(source = %short_reference(source), "image cache hit");
                return Ok(hit);
            }
            let bytes = self
                .fetch_bytes(source)
                .await
                .map_err(|reason| PosterError::load(short_reference(source), reason))?;
            let image = decode_image(&bytes)
                .map_err(|e| PosterError::load(short_reference(source), e))?;
            tracing::debug!(
                source = %short_reference(source),
                width = image.width,
                height = image.height,
                "image loaded"
            );
            self.insert(source, image.clone());
            Ok(image)
        }
        .boxed()
    }
}

/// Decode the payload of a `data:[<mime>][;base64],<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, String> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| "not a data url".to_owned())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data url has no ',' separator".to_owned())?;

    if header.ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        return base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| format!("invalid base64 payload: {e}"));
    }
    percent_decode(payload)
}

fn percent_decode(s: &str) -> Result<Vec<u8>, String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s
                .get(i + 1..i + 3)
                .ok_or_else(|| "truncated percent escape".to_owned())?;
            let v = u8::from_str_radix(hex, 16)
                .map_err(|_| format!("invalid percent escape \"%{hex}\""))?;
            out.push(v);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Shorten inline payloads for logs and error messages.
pub(crate) fn short_reference(source: &str) -> String {
    const MAX: usize = 48;
    if source.chars().count() <= MAX {
        return source.to_owned();
    }
    let head: String = source.chars().take(MAX).collect();
    format!("{head}...")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
