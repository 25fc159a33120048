//! Rendered-view cache and invalidation.
//!
//! Actions never render; they only mark the logical views they changed as
//! stale. The next read of a stale (or never rendered) view recomputes it.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Logical view path, e.g. `/dashboard/invoices`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ViewPath(Cow<'static, str>);

impl ViewPath {
    pub const DASHBOARD: ViewPath = ViewPath(Cow::Borrowed("/dashboard"));
    pub const INVOICES: ViewPath = ViewPath(Cow::Borrowed("/dashboard/invoices"));

    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ViewPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// View invalidation boundary.
pub trait ViewCache: Send + Sync {
    /// Mark `path` stale so its next render recomputes it.
    fn revalidate(&self, path: &ViewPath);
}

impl<V> ViewCache for Arc<V>
where
    V: ViewCache + ?Sized,
{
    fn revalidate(&self, path: &ViewPath) {
        (**self).revalidate(path)
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    rendered: Option<JsonValue>,
    revalidations: u64,
}

/// In-memory cache of rendered views.
#[derive(Debug, Default)]
pub struct InMemoryViewCache {
    entries: RwLock<HashMap<ViewPath, Entry>>,
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the view has no fresh rendering.
    pub fn is_stale(&self, path: &ViewPath) -> bool {
        match self.entries.read() {
            Ok(map) => map.get(path).is_none_or(|e| e.rendered.is_none()),
            Err(_) => true,
        }
    }

    /// How many times `path` has been revalidated.
    pub fn revalidations(&self, path: &ViewPath) -> u64 {
        match self.entries.read() {
            Ok(map) => map.get(path).map_or(0, |e| e.revalidations),
            Err(_) => 0,
        }
    }

    /// Serve the cached rendering of `path`, or render and cache it.
    ///
    /// No lock is held while `render` runs. The result is cached only if no
    /// revalidation landed in the meantime; otherwise it is returned once
    /// and the view stays stale.
    pub async fn get_or_render<F, Fut, E>(&self, path: &ViewPath, render: F) -> Result<JsonValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<JsonValue, E>>,
    {
        let (cached, generation) = match self.entries.read() {
            Ok(map) => map
                .get(path)
                .map_or((None, 0), |e| (e.rendered.clone(), e.revalidations)),
            Err(_) => (None, 0),
        };
        if let Some(rendered) = cached {
            return Ok(rendered);
        }

        debug!(path = %path, "rendering view");
        let rendered = render().await?;
        if let Ok(mut map) = self.entries.write() {
            let entry = map.entry(path.clone()).or_default();
            if entry.revalidations == generation {
                entry.rendered = Some(rendered.clone());
            } else {
                debug!(path = %path, "view revalidated during render; not cached");
            }
        }
        Ok(rendered)
    }
}

impl ViewCache for InMemoryViewCache {
    fn revalidate(&self, path: &ViewPath) {
        if let Ok(mut map) = self.entries.write() {
            let entry = map.entry(path.clone()).or_default();
            entry.rendered = None;
            entry.revalidations += 1;
        }
        debug!(path = %path, "view revalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn revalidated_view_is_recomputed_once() {
        let cache = InMemoryViewCache::new();
        let counter = AtomicUsize::new(0);
        let renders = &counter;
        let render = move || async move {
            renders.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(serde_json::json!([]))
        };

        assert!(cache.is_stale(&ViewPath::INVOICES));
        cache.get_or_render(&ViewPath::INVOICES, render).await.unwrap();
        cache.get_or_render(&ViewPath::INVOICES, render).await.unwrap();
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert!(!cache.is_stale(&ViewPath::INVOICES));

        cache.revalidate(&ViewPath::INVOICES);
        assert!(cache.is_stale(&ViewPath::INVOICES));
        assert_eq!(cache.revalidations(&ViewPath::INVOICES), 1);

        cache.get_or_render(&ViewPath::INVOICES, render).await.unwrap();
        assert_eq!(renders.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_render_is_not_cached() {
        let cache = InMemoryViewCache::new();
        let err = cache
            .get_or_render(&ViewPath::INVOICES, || async { Err::<JsonValue, _>("down") })
            .await
            .unwrap_err();
        assert_eq!(err, "down");
        assert!(cache.is_stale(&ViewPath::INVOICES));
    }

    #[tokio::test]
    async fn revalidation_during_render_discards_the_snapshot() {
        let cache = InMemoryViewCache::new();

        // The write (and its revalidation) lands after the snapshot was taken.
        let snapshot = cache
            .get_or_render(&ViewPath::INVOICES, || async {
                let rows = serde_json::json!([]);
                cache.revalidate(&ViewPath::INVOICES);
                Ok::<_, ()>(rows)
            })
            .await
            .unwrap();
        assert_eq!(snapshot, serde_json::json!([]));
        assert!(cache.is_stale(&ViewPath::INVOICES));

        let next = cache
            .get_or_render(&ViewPath::INVOICES, || async {
                Ok::<_, ()>(serde_json::json!(["new row"]))
            })
            .await
            .unwrap();
        assert_eq!(next, serde_json::json!(["new row"]));
        assert!(!cache.is_stale(&ViewPath::INVOICES));
    }

    #[test]
    fn revalidation_is_per_path() {
        let cache = InMemoryViewCache::new();
        cache.revalidate(&ViewPath::new("/dashboard/customers"));
        assert_eq!(cache.revalidations(&ViewPath::INVOICES), 0);
    }
}
