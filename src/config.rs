/// Capacity used by [`HashTable::new`](crate::HashTable::new).
pub const DEFAULT_CAPACITY: usize = 9999;

/// Smallest backing array a table will allocate.
pub const MIN_CAPACITY: usize = 1;

/// What `remove` leaves behind in the slot it empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Reset the slot straight to empty.
    ///
    /// Any key that was displaced past this slot when it was inserted becomes
    /// unreachable, because later probes stop at the new hole.
    #[default]
    Reset,
    /// Leave a tombstone that lookups walk over and inserts may reuse.
    /// Tombstones count towards the load factor and are dropped on resize.
    Tombstone,
}

/// Construction-time settings of a [`HashTable`](crate::HashTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub removal: RemovalPolicy,
    /// Maximum probe steps taken after the home slot. `None` uses the current capacity.
    pub probe_limit: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            removal: RemovalPolicy::Reset,
            probe_limit: None,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial slot count. Values below [`MIN_CAPACITY`] are raised to it.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(MIN_CAPACITY);
        self
    }

    pub fn with_removal_policy(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Caps the number of probe steps; `0` means only the home slot is examined.
    pub fn with_probe_limit(mut self, limit: usize) -> Self {
        self.probe_limit = Some(limit);
        self
    }

    /// Probe steps allowed for a table of `capacity` slots.
    pub(crate) fn probe_limit_for(&self, capacity: usize) -> usize {
        self.probe_limit.unwrap_or(capacity)
    }
}
