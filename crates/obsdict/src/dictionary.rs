#![forbid(unsafe_code)]

//! The mutable observable dictionary.
//!
//! # Design
//!
//! [`ObservableDictionary<K, V>`] keeps its entries in an insertion-ordered
//! [`IndexMap`] behind shared, reference-counted storage
//! (`Rc<RefCell<..>>`). The derived [`Keys`] and [`Values`] sequences read
//! that same map by position, so a single mutation routine updates storage
//! and both sequences at once, before any subscriber hears about it.
//!
//! Every structural mutation then publishes, in order:
//!
//! 1. one [`Change`] to change subscribers,
//! 2. the new count to count subscribers,
//! 3. one [`SequenceChange`] to Keys subscribers, then to Values subscribers.
//!
//! ```text
//! add("k", "b") with ("k", "a") present
//! ┌──────────────────────────────────────────────┐
//! │ Removed { key: "k", value: "a", index: i }   │
//! │ count = n - 1                                 │
//! │ Added   { key: "k", value: "b" }             │
//! │ count = n                                     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `count() == keys().len() == values().len()` whenever a caller or a
//!    subscriber can observe the dictionary.
//! 2. `keys()[i]` and `values()[i]` belong to the same entry.
//! 3. Overwriting a key is a removal followed by an addition; the new entry
//!    moves to the end of iteration order.
//! 4. `version()` increments by exactly 1 per published [`Change`].
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: mutating from inside a subscriber callback
//!   nests a second publish inside the first. Later subscribers of the outer
//!   publish then see the nested state. Not supported.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::{Equivalent, IndexMap};
use tracing::trace;

use crate::change::{Change, SequenceChange};
use crate::channel::{Channel, Subscription};
use crate::error::DictionaryError;
use crate::mapping::ObservableMapping;
use crate::sequence::{Keys, Values};
use crate::view::ReadOnlyObservableDictionary;

/// Configuration for an [`ObservableDictionary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryConfig {
    /// Entries to pre-allocate storage for.
    pub capacity: usize,
    /// Publish `Reset` (and the count) when `clear()` runs on an empty
    /// dictionary.
    pub notify_empty_clear: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            capacity: 0,
            notify_empty_clear: true,
        }
    }
}

impl DictionaryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_notify_empty_clear(mut self, notify: bool) -> Self {
        self.notify_empty_clear = notify;
        self
    }
}

pub(crate) struct State<K, V> {
    pub(crate) entries: IndexMap<K, V>,
    version: u64,
}

/// Storage and subscriber lists shared by every handle onto one dictionary.
pub(crate) struct Shared<K, V> {
    pub(crate) state: RefCell<State<K, V>>,
    config: DictionaryConfig,
    changes: Channel<Change<K, V>>,
    counts: Channel<usize>,
    pub(crate) key_changes: Channel<SequenceChange<K>>,
    pub(crate) value_changes: Channel<SequenceChange<V>>,
}

/// A key-value mapping that publishes every structural change.
///
/// Cloning an `ObservableDictionary` creates a new handle to the **same**
/// dictionary: both handles see the same entries and share subscribers.
pub struct ObservableDictionary<K, V> {
    shared: Rc<Shared<K, V>>,
}

impl<K, V> ObservableDictionary<K, V> {
    pub(crate) const KIND: &'static str = "mutable";
}

impl<K, V> Clone for ObservableDictionary<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ObservableDictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("ObservableDictionary")
            .field("entries", &state.entries)
            .field("version", &state.version)
            .field("subscriber_count", &self.shared.changes.subscriber_count())
            .finish()
    }
}

impl<K, V> Default for ObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<IndexMap<K, V>> for ObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn from(entries: IndexMap<K, V>) -> Self {
        Self::seeded(entries, DictionaryConfig::default())
    }
}

impl<K, V> FromIterator<(K, V)> for ObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexMap<K, V>>())
    }
}

impl<K, V> ObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DictionaryConfig::default())
    }

    /// Create an empty dictionary with the given configuration.
    #[must_use]
    pub fn with_config(config: DictionaryConfig) -> Self {
        let entries = IndexMap::with_capacity(config.capacity);
        Self::seeded(entries, config)
    }

    /// Create a dictionary holding a copy of `entries`, in their order.
    ///
    /// Seeding publishes nothing and leaves the version at 0. When a key
    /// repeats, it keeps its first position and its last value.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        entries.into_iter().collect()
    }

    fn seeded(entries: IndexMap<K, V>, config: DictionaryConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(State {
                    entries,
                    version: 0,
                }),
                config,
                changes: Channel::new(),
                counts: Channel::new(),
                key_changes: Channel::new(),
                value_changes: Channel::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DictionaryConfig {
        &self.shared.config
    }

    /// Insert `value` under `key`.
    ///
    /// If `key` is already present its entry is removed first, publishing a
    /// [`Change::Removed`]; the new entry is then appended and a
    /// [`Change::Added`] published. There is no silent overwrite.
    pub fn add(&self, key: K, value: V) {
        self.remove(&key);
        let (count, version) = {
            let mut state = self.shared.state.borrow_mut();
            state.entries.insert(key.clone(), value.clone());
            state.version += 1;
            (state.entries.len(), state.version)
        };
        self.publish(&Change::Added { key, value }, count, version);
    }

    /// Indexed assignment. Same as [`add`](Self::add).
    pub fn set(&self, key: K, value: V) {
        self.add(key, value);
    }

    /// Remove the entry under `key`.
    ///
    /// Returns `false`, publishing nothing, when the key is absent. The
    /// published [`Change::Removed`] carries the entry's position in
    /// iteration order just before removal.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let removed = {
            let mut state = self.shared.state.borrow_mut();
            match state.entries.shift_remove_full(key) {
                Some((index, key, value)) => {
                    state.version += 1;
                    Some((index, key, value, state.entries.len(), state.version))
                }
                None => None,
            }
        };
        match removed {
            Some((index, key, value, count, version)) => {
                self.publish(&Change::Removed { key, value, index }, count, version);
                true
            }
            None => false,
        }
    }

    /// Remove the entry under `key` only if its value equals `value`.
    pub fn remove_entry<Q>(&self, key: &Q, value: &V) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
        V: PartialEq,
    {
        let matches = self
            .shared
            .state
            .borrow()
            .entries
            .get(key)
            .is_some_and(|stored| stored == value);
        matches && self.remove(key)
    }

    /// Remove every entry, publishing a single [`Change::Reset`].
    pub fn clear(&self) {
        let version = {
            let mut state = self.shared.state.borrow_mut();
            if state.entries.is_empty() && !self.shared.config.notify_empty_clear {
                return;
            }
            state.entries.clear();
            state.version += 1;
            state.version
        };
        self.publish(&Change::Reset, 0, version);
    }

    /// A read-only view relaying this dictionary's notifications.
    #[must_use]
    pub fn read_only(&self) -> ReadOnlyObservableDictionary<K, V> {
        ReadOnlyObservableDictionary::wrap(self)
    }

    /// Whether both handles refer to the same dictionary.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Number of registered change subscribers, including dead ones not yet
    /// pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.changes.subscriber_count()
    }

    fn publish(&self, change: &Change<K, V>, count: usize, version: u64) {
        let shared = &self.shared;
        trace!(
            action = change.action().as_str(),
            count,
            version,
            "observable dictionary changed"
        );
        shared.changes.emit(change);
        shared.counts.emit(&count);
        if shared.key_changes.subscriber_count() > 0 {
            shared.key_changes.emit(&change.key_change(count));
        }
        if shared.value_changes.subscriber_count() > 0 {
            shared.value_changes.emit(&change.value_change(count));
        }
    }
}

impl<K, V> ObservableMapping<K, V> for ObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn get<Q>(&self, key: &Q) -> Result<V, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.try_get(key).ok_or(DictionaryError::KeyNotFound)
    }

    fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.shared.state.borrow().entries.get(key).cloned()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.shared.state.borrow().entries.contains_key(key)
    }

    fn count(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    fn entries(&self) -> Vec<(K, V)> {
        let state = self.shared.state.borrow();
        state
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        let state = self.shared.state.borrow();
        for (k, v) in &state.entries {
            f(k, v);
        }
    }

    fn keys(&self) -> Keys<K, V> {
        Keys::new(Rc::clone(&self.shared))
    }

    fn values(&self) -> Values<K, V> {
        Values::new(Rc::clone(&self.shared))
    }

    fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn subscribe(&self, callback: impl Fn(&Change<K, V>) + 'static) -> Subscription {
        self.shared.changes.subscribe(callback)
    }

    fn subscribe_count(&self, callback: impl Fn(usize) + 'static) -> Subscription {
        self.shared.counts.subscribe(move |count: &usize| callback(*count))
    }

    fn try_add(&self, key: K, value: V) -> Result<(), DictionaryError> {
        self.add(key, value);
        Ok(())
    }

    fn try_remove<Q>(&self, key: &Q) -> Result<bool, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        Ok(self.remove(key))
    }

    fn try_clear(&self) -> Result<(), DictionaryError> {
        self.clear();
        Ok(())
    }
}
