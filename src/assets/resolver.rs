use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;

use crate::assets::decode::DecodedImage;
use crate::assets::loader::ResourceLoader;
use crate::foundation::error::PosterResult;
use crate::model::descriptor::{QrId, QrPayload, RenderDescriptor};

/// Lookup key of a loaded resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// An image descriptor's source reference.
    Source(String),
    /// A QR code descriptor's generated id.
    QrCode(QrId),
}

/// Every external image needed by a queue, decoded and keyed.
#[derive(Debug, Default)]
pub struct ResourceTable {
    images: HashMap<ResourceKey, DecodedImage>,
}

impl ResourceTable {
    pub fn get(&self, key: &ResourceKey) -> Option<&DecodedImage> {
        self.images.get(key)
    }

    pub fn source(&self, source: &str) -> Option<&DecodedImage> {
        self.images.get(&ResourceKey::Source(source.to_owned()))
    }

    pub fn qr_code(&self, id: QrId) -> Option<&DecodedImage> {
        self.images.get(&ResourceKey::QrCode(id))
    }

    pub fn insert(&mut self, key: ResourceKey, image: DecodedImage) {
        self.images.insert(key, image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

enum LoadJob<'q> {
    Source(&'q str),
    QrCode(QrId, &'q QrPayload),
}

/// Load every distinct image source and every QR payload of `items` concurrently.
///
/// All loads are started together and joined; the table is returned only if every load
/// succeeded. The first failure is returned otherwise and partial results are dropped.
#[tracing::instrument(skip_all, fields(items = items.len()))]
pub async fn resolve_resources<L: ResourceLoader + ?Sized>(
    items: &[RenderDescriptor],
    loader: &L,
) -> PosterResult<ResourceTable> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::new();
    for item in items {
        match item {
            RenderDescriptor::Image(img) if !img.source.is_empty() => {
                if seen.insert(img.source.as_str()) {
                    jobs.push(LoadJob::Source(&img.source));
                }
            }
            RenderDescriptor::QrCode(qr) => jobs.push(LoadJob::QrCode(qr.id, &qr.payload)),
            _ => {}
        }
    }
    tracing::debug!(loads = jobs.len(), "resolving resources");

    let loaded = try_join_all(jobs.into_iter().map(|job| run_job(loader, job))).await?;
    Ok(ResourceTable {
        images: loaded.into_iter().collect(),
    })
}

async fn run_job<L: ResourceLoader + ?Sized>(
    loader: &L,
    job: LoadJob<'_>,
) -> PosterResult<(ResourceKey, DecodedImage)> {
    match job {
        LoadJob::Source(source) => {
            let image = loader.load(source).await?;
            Ok((ResourceKey::Source(source.to_owned()), image))
        }
        LoadJob::QrCode(id, payload) => {
            let source = payload.resolve().await.inspect_err(|e| {
                tracing::warn!(qr = %id, error = %e, "qr payload failed");
            })?;
            let image = loader.load(&source).await?;
            Ok((ResourceKey::QrCode(id), image))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
