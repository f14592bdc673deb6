use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::LazyLock;

use ahash::RandomState;
use log::{debug, trace, warn};

use crate::config::{RemovalPolicy, TableConfig, MIN_CAPACITY};
use crate::error::{MapError, Result};

// ================================================================================================
// CONSTANTS AND GLOBAL VARIABLES
// ================================================================================================

/// Occupancy ratio above which an insert of a new key grows the table first
const LOAD_FACTOR: f64 = 0.75;

// Fixed seeds keep probe geometry identical for every table in the process.
static HASH_STATE: LazyLock<RandomState> = LazyLock::new(|| {
    RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
});

// ================================================================================================
// INTERNAL DATA STRUCTURES
// ================================================================================================

/// State of one position in the backing array
#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    /// Tombstone left by `remove` under `RemovalPolicy::Tombstone`
    Deleted,
    Occupied(K, V),
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            _ => None,
        }
    }
}

/// Where a probe walk for a key ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The slot holds an equal key.
    Found(usize),
    /// The key is absent; a new entry for it belongs in this slot.
    Vacant(usize),
    /// The key is absent and no usable slot lies within the probe bound.
    Exhausted,
}

// ================================================================================================
// MAIN TABLE STRUCTURE
// ================================================================================================

/// Open-addressing hash table resolving collisions with quadratic probing.
///
/// Every entry lives directly in one backing array. A key's walk starts at
/// `abs(hash) % capacity` and then advances by `1², 2², 3², …` (mod capacity)
/// until it meets an equal key or an empty slot. Once an insert of a new key
/// would push occupancy past 0.75, the array is replaced by one of
/// `capacity * 2 + 1` slots and every entry is rehashed into it.
///
/// Quadratic steps do not visit every slot of an arbitrary capacity, so each
/// walk is bounded (see [`TableConfig::with_probe_limit`]). A lookup that runs
/// out of steps reports the key absent; an insert grows the table once and
/// retries before failing with [`MapError::ProbeExhausted`].
///
/// With the default [`RemovalPolicy::Reset`], `remove` empties the slot in
/// place. A key that had been displaced past that slot is then no longer found
/// by `get` or `contains_key`, although it still occupies a slot and is still
/// counted by `len`, `values` and the `Display` dump.
#[derive(Clone)]
pub struct HashTable<K, V> {
    slots: Vec<Slot<K, V>>,
    count: usize,
    tombstones: usize,
    config: TableConfig,
}

// ================================================================================================
// TABLE CONSTRUCTORS
// ================================================================================================

impl<K: Eq + Hash, V> HashTable<K, V> {
    /// Create a table with the default capacity of 9999 slots.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a table with exactly `capacity` slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TableConfig::default().with_initial_capacity(capacity))
    }

    pub fn with_config(config: TableConfig) -> Self {
        let capacity = config.initial_capacity.max(MIN_CAPACITY);
        Self {
            slots: empty_slots(capacity),
            count: 0,
            tombstones: 0,
            config,
        }
    }

    // ============================================================================================
    // PUBLIC API METHODS
    // ============================================================================================

    /// Reset every slot to empty. The capacity is kept.
    pub fn clear(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.count = 0;
        self.tombstones = 0;
        debug!("cleared table of {} slots", self.slots.len());
    }

    /// Check whether the walk for `key` ends on an occupied slot.
    pub fn contains_key<'k, Q>(&self, key: Q) -> Result<bool>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
    {
        let key = key.into().ok_or(MapError::InvalidArgument)?;
        Ok(matches!(self.probe(key), Probe::Found(_)))
    }

    /// Scan every slot for `value`. O(capacity).
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|candidate| candidate == value)
    }

    pub fn get<'k, Q>(&self, key: Q) -> Result<Option<&V>>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
    {
        let key = key.into().ok_or(MapError::InvalidArgument)?;
        match self.probe(key) {
            Probe::Found(idx) => Ok(self.slots[idx].entry().map(|(_, value)| value)),
            Probe::Vacant(_) | Probe::Exhausted => Ok(None),
        }
    }

    /// Like [`get`](Self::get), but returns `default` when the key has no mapping.
    pub fn get_or_default<'k, Q>(&self, key: Q, default: V) -> Result<V>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
        V: Clone,
    {
        Ok(self.get(key)?.cloned().unwrap_or(default))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Associate `value` with `key`, overwriting any previous value.
    ///
    /// A new key grows the table first when it would take occupancy past the
    /// load factor. Inserting and updating are not distinguished.
    pub fn put<Q>(&mut self, key: Q, value: V) -> Result<()>
    where
        Q: Into<Option<K>>,
    {
        let key = key.into().ok_or(MapError::InvalidArgument)?;

        let mut probe = self.probe(&key);
        if let Probe::Found(idx) = probe {
            self.slots[idx] = Slot::Occupied(key, value);
            return Ok(());
        }
        if matches!(probe, Probe::Vacant(_)) && self.needs_grow() {
            self.resize();
            probe = self.probe(&key);
        }
        if probe == Probe::Exhausted {
            trace!(
                "insert walk exhausted at capacity {}, growing before retry",
                self.slots.len()
            );
            self.resize();
            probe = self.probe(&key);
        }

        match probe {
            Probe::Vacant(idx) => {
                self.occupy(idx, key, value);
                Ok(())
            }
            Probe::Found(idx) => {
                self.slots[idx] = Slot::Occupied(key, value);
                Ok(())
            }
            Probe::Exhausted => {
                let err = MapError::ProbeExhausted {
                    probes: self.probe_limit(),
                    capacity: self.slots.len(),
                };
                warn!("insert rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Remove the mapping for `key`, returning its value.
    ///
    /// Under [`RemovalPolicy::Reset`] the slot goes straight back to empty,
    /// which cuts the walk of any key that was displaced past it.
    pub fn remove<'k, Q>(&mut self, key: Q) -> Result<Option<V>>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
    {
        let key = key.into().ok_or(MapError::InvalidArgument)?;
        let Probe::Found(idx) = self.probe(key) else {
            return Ok(None);
        };

        let vacated = match self.config.removal {
            RemovalPolicy::Reset => Slot::Empty,
            RemovalPolicy::Tombstone => {
                self.tombstones += 1;
                Slot::Deleted
            }
        };
        // Found always points at an occupied slot.
        let Slot::Occupied(_, value) = std::mem::replace(&mut self.slots[idx], vacated) else {
            unreachable!("probe resolved to a slot without an entry");
        };
        self.count -= 1;
        Ok(Some(value))
    }

    /// Overwrite the value of a key that is already present.
    ///
    /// Fails with [`MapError::NotFound`] and leaves the table untouched when
    /// the key has no mapping.
    pub fn replace<Q>(&mut self, key: Q, value: V) -> Result<bool>
    where
        Q: Into<Option<K>>,
    {
        let key = key.into().ok_or(MapError::InvalidArgument)?;
        match self.probe(&key) {
            Probe::Found(idx) => {
                self.slots[idx] = Slot::Occupied(key, value);
                Ok(true)
            }
            Probe::Vacant(_) | Probe::Exhausted => Err(MapError::NotFound),
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Alias of [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }

    /// Number of slots in the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // ============================================================================================
    // PRIVATE HELPER METHODS
    // ============================================================================================

    #[inline]
    fn probe_limit(&self) -> usize {
        self.config.probe_limit_for(self.slots.len())
    }

    fn probe(&self, key: &K) -> Probe {
        let capacity = self.slots.len();
        let mut idx = home_index(key, capacity);
        let mut first_tombstone = None;

        for step in 0..=self.probe_limit() {
            if step > 0 {
                idx = (idx + quadratic_step(step, capacity)) % capacity;
            }
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(idx)),
                Slot::Occupied(existing, _) if existing == key => return Probe::Found(idx),
                Slot::Occupied(..) => {}
                Slot::Deleted => {
                    first_tombstone.get_or_insert(idx);
                }
            }
        }

        match first_tombstone {
            Some(idx) => Probe::Vacant(idx),
            None => Probe::Exhausted,
        }
    }

    #[inline]
    fn occupy(&mut self, idx: usize, key: K, value: V) {
        if let Slot::Deleted = self.slots[idx] {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Occupied(key, value);
        self.count += 1;
    }

    #[inline]
    fn needs_grow(&self) -> bool {
        (self.count + self.tombstones + 1) as f64 / self.slots.len() as f64 > LOAD_FACTOR
    }

    fn resize(&mut self) {
        self.rebuild(grow_capacity(self.slots.len()));
    }

    /// Move every entry into a fresh array of `capacity` slots, growing
    /// further whenever an entry cannot be placed.
    fn rebuild(&mut self, mut capacity: usize) {
        let old_capacity = self.slots.len();
        self.drop_shadowed_duplicates();
        let mut pending = take_entries(std::mem::take(&mut self.slots));
        pending.reverse();

        loop {
            self.slots = empty_slots(capacity);
            self.count = 0;
            self.tombstones = 0;

            if self.place_all(&mut pending) {
                break;
            }

            // Start over from the live entries in slot order.
            let mut retry = take_entries(std::mem::take(&mut self.slots));
            retry.extend(pending.drain(..).rev());
            retry.reverse();
            pending = retry;
            capacity = grow_capacity(capacity);
            debug!("rehash walk exhausted, retrying with {} slots", capacity);
        }

        debug!(
            "resized table from {} to {} slots, {} entries rehashed",
            old_capacity,
            self.slots.len(),
            self.count
        );
    }

    /// Empty every slot whose key the walk reaches earlier in another slot.
    ///
    /// Reset removal can strand an entry and let a later `put` store the same
    /// key again nearer its home. `get` answers from the nearer copy, so that
    /// copy is the live one and the stranded one must not survive a rehash.
    fn drop_shadowed_duplicates(&mut self) {
        let shadowed: Vec<usize> = (0..self.slots.len())
            .filter(|&idx| match &self.slots[idx] {
                Slot::Occupied(key, _) => {
                    matches!(self.probe(key), Probe::Found(live) if live != idx)
                }
                _ => false,
            })
            .collect();

        for idx in shadowed {
            self.slots[idx] = Slot::Empty;
            self.count -= 1;
        }
    }

    /// Place entries popped from `pending`. Returns `false`, with the failing
    /// entry pushed back, as soon as one cannot be placed.
    fn place_all(&mut self, pending: &mut Vec<(K, V)>) -> bool {
        while let Some((key, value)) = pending.pop() {
            match self.probe(&key) {
                Probe::Vacant(idx) => self.occupy(idx, key, value),
                // Two stranded copies of one key: the first placed stays.
                Probe::Found(_) => {}
                Probe::Exhausted => {
                    pending.push((key, value));
                    return false;
                }
            }
        }
        true
    }
}

// ================================================================================================
// ITERATION
// ================================================================================================

impl<K, V> HashTable<K, V> {
    /// Iterate over `(key, value)` pairs in physical slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.count,
        }
    }

    /// Iterate over keys in physical slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterate over values in physical slot order (not insertion order).
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

/// Iterator over the key-value pairs of a HashTable
pub struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a HashTable
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over the values of a HashTable
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

// ================================================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<K: Eq + Hash, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One `key : value` line per occupied slot, in slot order.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{} : {}", key, value)?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for HashTable<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            // put has already logged the rejection
            if self.put(key, value).is_err() {
                debug!("skipped entry while extending table");
            }
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for HashTable<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = HashTable::new();
        table.extend(iter);
        table
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    std::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Drain the occupied entries of `slots`, in slot order
fn take_entries<K, V>(slots: Vec<Slot<K, V>>) -> Vec<(K, V)> {
    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Occupied(key, value) => Some((key, value)),
            _ => None,
        })
        .collect()
}

/// First slot of a key's walk: `abs(hash) % capacity`
#[inline]
fn home_index<K: Hash + ?Sized>(key: &K, capacity: usize) -> usize {
    let hash = BuildHasher::hash_one(&*HASH_STATE, key) as i64;
    (hash.unsigned_abs() % capacity as u64) as usize
}

/// Distance of the `step`-th hop of a walk: `step² % capacity`
#[inline]
fn quadratic_step(step: usize, capacity: usize) -> usize {
    let step = step as u128;
    ((step * step) % capacity as u128) as usize
}

#[inline]
fn grow_capacity(capacity: usize) -> usize {
    capacity * 2 + 1
}
