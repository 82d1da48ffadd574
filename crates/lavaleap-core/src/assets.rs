use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque handle to a decoded sprite owned by the host's asset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub u32);

/// Readiness query used once per draw. Implementations must never block.
pub trait AssetStore {
    /// The sprite for `key`, or `None` while it is still loading (or failed).
    fn sprite(&self, key: &str) -> Option<SpriteHandle>;
}

/// Loading state of a registered sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready(SpriteHandle),
    Failed,
}

/// Tracks sprites the host is loading asynchronously.
///
/// The host calls [`AssetRegistry::register`] when it starts a load and
/// [`AssetRegistry::mark_ready`] from its completion callback. The simulation
/// only ever reads through [`AssetStore`].
#[derive(Debug, Default, Clone)]
pub struct AssetRegistry {
    entries: HashMap<String, Readiness>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending load. Re-registering a ready sprite keeps it ready.
    pub fn register(&mut self, key: impl Into<String>) {
        self.entries.entry(key.into()).or_insert(Readiness::Pending);
    }

    pub fn mark_ready(&mut self, key: impl Into<String>, handle: SpriteHandle) {
        self.entries.insert(key.into(), Readiness::Ready(handle));
    }

    pub fn mark_failed(&mut self, key: impl Into<String>) {
        let key = key.into();
        tracing::warn!(sprite = %key, "Sprite failed to load, using fallback shape");
        self.entries.insert(key, Readiness::Failed);
    }

    pub fn readiness(&self, key: &str) -> Option<Readiness> {
        self.entries.get(key).copied()
    }

    /// Number of registered sprites still loading.
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|r| matches!(r, Readiness::Pending))
            .count()
    }
}

impl AssetStore for AssetRegistry {
    fn sprite(&self, key: &str) -> Option<SpriteHandle> {
        match self.entries.get(key) {
            Some(Readiness::Ready(handle)) => Some(*handle),
            _ => None,
        }
    }
}
