//! Run-scoped, identity-keyed storage shared by every subject of one chain.
//!
//! Parsers that need to coordinate across a single top-level parse (for example
//! "has this value been seen before") own a [`MemoryKey`] and read/write their
//! slot through any subject or builder of the run.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// An opaque owner identity.
///
/// Every call to [`MemoryKey::new`] yields a key distinct from all others, so two
/// parser instances of the same type never share a slot. Clones refer to the same
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryKey(u64);

impl MemoryKey {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        MemoryKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A stored memory entry.
pub type MemoryValue = Arc<dyn Any + Send + Sync>;

/// Handle to the store of one parse run. Cloning the handle shares the store.
#[derive(Clone, Default)]
pub struct Memory {
    slots: Arc<Mutex<HashMap<MemoryKey, MemoryValue>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another holder panicked mid-write; the map is
    // still structurally valid.
    fn slots(&self) -> MutexGuard<'_, HashMap<MemoryKey, MemoryValue>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set<T: Any + Send + Sync>(&self, key: MemoryKey, value: T) {
        trace!("memory: set slot {}", key.id());
        self.slots().insert(key, Arc::new(value));
    }

    pub fn has(&self, key: MemoryKey) -> bool {
        self.slots().contains_key(&key)
    }

    /// Returns a clone of the stored value, or `default` when the slot is empty or
    /// holds a different type.
    pub fn get<T: Any + Send + Sync + Clone>(&self, key: MemoryKey, default: T) -> T {
        self.get_raw(key)
            .and_then(|stored| stored.downcast_ref::<T>().cloned())
            .unwrap_or(default)
    }

    pub fn get_raw(&self, key: MemoryKey) -> Option<MemoryValue> {
        self.slots().get(&key).cloned()
    }

    pub fn remove(&self, key: MemoryKey) -> Option<MemoryValue> {
        self.slots().remove(&key)
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    pub fn keys(&self) -> Vec<MemoryKey> {
        let mut keys: Vec<MemoryKey> = self.slots().keys().copied().collect();
        keys.sort_by_key(MemoryKey::id);
        keys
    }

    /// True when both handles point at the same store.
    pub fn same_store(&self, other: &Memory) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory").field("slots", &self.len()).finish()
    }
}
