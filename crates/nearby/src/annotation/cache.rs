use ahash::AHashMap as HashMap;

use super::{Annotation, CoordinateKey};

/// Accumulates pins across searches, one entry per coordinate identity.
///
/// There is no eviction: a cache lives exactly as long as the coordinator
/// that owns it.
#[derive(Debug, Default)]
pub struct AnnotationCache {
    entries: HashMap<CoordinateKey, Annotation>,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `annotations` and return the full contents afterwards.
    ///
    /// An annotation whose identity is already cached replaces the stored one.
    pub fn upsert_all(&mut self, annotations: impl IntoIterator<Item = Annotation>) -> Vec<Annotation> {
        for annotation in annotations {
            self.entries.insert(annotation.identity(), annotation);
        }
        self.snapshot()
    }

    /// Current contents, in no particular order.
    pub fn snapshot(&self) -> Vec<Annotation> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
