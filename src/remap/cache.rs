use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::foundation::error::SlotfitResult;
use crate::remap::fingerprint::{InputFingerprint, fingerprint_inputs};
use crate::remap::payload::{Payload, SourceContext, compute_payload};
use crate::remap::transform::RemapSettings;
use crate::scene::template::TargetSlot;

#[derive(Debug)]
struct CacheEntry {
    fingerprint: InputFingerprint,
    payload: Arc<Payload>,
}

/// Hit/miss counters of a [`PayloadCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Payloads reused because their inputs were unchanged.
    pub hits: u64,
    /// Payloads (re)computed.
    pub misses: u64,
}

/// Last payload per remap instance, keyed by instance id.
///
/// An instance is recomputed only when its input fingerprint changes; the new payload
/// replaces the old one wholesale.
#[derive(Debug, Default)]
pub struct PayloadCache {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl PayloadCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached payload for `instance` if it was computed from exactly `fingerprint`.
    pub fn lookup(&mut self, instance: &str, fingerprint: InputFingerprint) -> Option<Arc<Payload>> {
        let hit = self
            .entries
            .get(instance)
            .filter(|e| e.fingerprint == fingerprint)
            .map(|e| Arc::clone(&e.payload));
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Store a freshly computed payload, superseding any previous one.
    pub fn store(&mut self, instance: &str, fingerprint: InputFingerprint, payload: Arc<Payload>) {
        self.stats.misses += 1;
        self.entries.insert(
            instance.to_string(),
            CacheEntry {
                fingerprint,
                payload,
            },
        );
    }

    /// Return the cached payload or compute and store a new one.
    pub fn get_or_compute(
        &mut self,
        instance: &str,
        source: &SourceContext,
        slot: &TargetSlot,
        settings: &RemapSettings,
    ) -> SlotfitResult<Arc<Payload>> {
        let fingerprint = fingerprint_inputs(source, slot, settings);
        if let Some(p) = self.lookup(instance, fingerprint) {
            return Ok(p);
        }
        let payload = Arc::new(compute_payload(source, slot, settings)?);
        self.store(instance, fingerprint, Arc::clone(&payload));
        Ok(payload)
    }

    /// Drop an instance whose computation failed or was removed.
    pub fn invalidate(&mut self, instance: &str) {
        self.entries.remove(instance);
    }

    /// Drop every instance not in `live`.
    pub fn retain_instances<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let live: HashSet<&str> = live.into_iter().collect();
        self.entries.retain(|k, _| live.contains(k.as_str()));
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remap/cache.rs"]
mod tests;
