//! Per-instance scheduling guards for the resizer
//!
//! All three are plain values owned by one resizer, so two widgets on the same
//! page never share a throttle flag or an observed-container record.

/// Allows at most one pending animation frame at a time
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the frame slot. Returns false if a frame is already pending.
    pub fn try_schedule(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Release the slot once the frame callback has run
    pub fn complete(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Set-once record of containers that already carry a size observer
///
/// Entries are never removed. Keys only need equality, so DOM handles can be
/// stored directly.
#[derive(Debug)]
pub struct ObservedSet<K> {
    keys: Vec<K>,
}

impl<K> Default for ObservedSet<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<K: PartialEq> ObservedSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`. Returns true only the first time it is seen.
    pub fn insert(&mut self, key: K) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Trailing-edge debounce by generation
///
/// Each trigger takes a new ticket; when the delayed callback fires it only
/// proceeds if its ticket is still the latest.
#[derive(Debug, Default)]
pub struct Debounce {
    generation: u64,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new wait, superseding any earlier one
    pub fn ticket(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// True if `ticket` has not been superseded
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation == ticket
    }
}
