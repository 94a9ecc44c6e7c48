#![forbid(unsafe_code)]

//! The mapping surface shared by every observable variant.
//!
//! [`ObservableMapping`] is implemented by [`ObservableDictionary`] (the
//! source of truth) and [`ReadOnlyObservableDictionary`] (a relay).
//! [`ObservableMap`] is the tagged union over both, for callers that hold
//! either kind behind one type.

use std::hash::Hash;

use indexmap::Equivalent;

use crate::change::Change;
use crate::channel::Subscription;
use crate::dictionary::ObservableDictionary;
use crate::error::DictionaryError;
use crate::sequence::{Keys, Values};
use crate::view::ReadOnlyObservableDictionary;

/// Read access, subscription, and fallible mutation for an observable
/// key-value mapping.
///
/// Iteration order is insertion order. `keys()` and `values()` return live
/// handles onto the same derived sequences for every variant that shares a
/// dictionary.
pub trait ObservableMapping<K, V> {
    /// Clone of the value under `key`, or [`DictionaryError::KeyNotFound`].
    fn get<Q>(&self, key: &Q) -> Result<V, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>;

    /// Clone of the value under `key`, if present.
    fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>;

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>;

    /// Number of entries.
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Snapshot of all entries in iteration order.
    fn entries(&self) -> Vec<(K, V)>;

    /// Visit entries in iteration order without cloning them.
    ///
    /// The mapping is borrowed for the duration of the call; `f` must not
    /// mutate it.
    fn for_each(&self, f: impl FnMut(&K, &V));

    /// Live key sequence.
    fn keys(&self) -> Keys<K, V>;

    /// Live value sequence, index-aligned with [`keys`](Self::keys).
    fn values(&self) -> Values<K, V>;

    /// Number of change notifications emitted so far.
    fn version(&self) -> u64;

    /// Whether mutation through this handle is rejected.
    fn is_read_only(&self) -> bool;

    /// Subscribe to [`Change`] notifications.
    fn subscribe(&self, callback: impl Fn(&Change<K, V>) + 'static) -> Subscription;

    /// Subscribe to the count signal. The callback receives the new count
    /// once after every change notification.
    fn subscribe_count(&self, callback: impl Fn(usize) + 'static) -> Subscription;

    /// Add or overwrite an entry.
    fn try_add(&self, key: K, value: V) -> Result<(), DictionaryError>;

    /// Remove an entry. `Ok(false)` when the key was absent.
    fn try_remove<Q>(&self, key: &Q) -> Result<bool, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>;

    /// Remove every entry.
    fn try_clear(&self) -> Result<(), DictionaryError>;
}

/// Either observable variant behind one type.
pub enum ObservableMap<K, V> {
    Mutable(ObservableDictionary<K, V>),
    ReadOnly(ReadOnlyObservableDictionary<K, V>),
}

impl<K, V> ObservableMap<K, V> {
    /// Human-readable variant name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mutable(_) => ObservableDictionary::<K, V>::KIND,
            Self::ReadOnly(_) => ReadOnlyObservableDictionary::<K, V>::KIND,
        }
    }
}

impl<K, V> Clone for ObservableMap<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Mutable(d) => Self::Mutable(d.clone()),
            Self::ReadOnly(v) => Self::ReadOnly(v.clone()),
        }
    }
}

impl<K, V> From<ObservableDictionary<K, V>> for ObservableMap<K, V> {
    fn from(dictionary: ObservableDictionary<K, V>) -> Self {
        Self::Mutable(dictionary)
    }
}

impl<K, V> From<ReadOnlyObservableDictionary<K, V>> for ObservableMap<K, V> {
    fn from(view: ReadOnlyObservableDictionary<K, V>) -> Self {
        Self::ReadOnly(view)
    }
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            ObservableMap::Mutable($inner) => $body,
            ObservableMap::ReadOnly($inner) => $body,
        }
    };
}

impl<K, V> ObservableMapping<K, V> for ObservableMap<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn get<Q>(&self, key: &Q) -> Result<V, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        dispatch!(self, m => m.get(key))
    }

    fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        dispatch!(self, m => m.try_get(key))
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        dispatch!(self, m => m.contains_key(key))
    }

    fn count(&self) -> usize {
        dispatch!(self, m => m.count())
    }

    fn entries(&self) -> Vec<(K, V)> {
        dispatch!(self, m => m.entries())
    }

    fn for_each(&self, f: impl FnMut(&K, &V)) {
        dispatch!(self, m => m.for_each(f))
    }

    fn keys(&self) -> Keys<K, V> {
        dispatch!(self, m => m.keys())
    }

    fn values(&self) -> Values<K, V> {
        dispatch!(self, m => m.values())
    }

    fn version(&self) -> u64 {
        dispatch!(self, m => m.version())
    }

    fn is_read_only(&self) -> bool {
        dispatch!(self, m => m.is_read_only())
    }

    fn subscribe(&self, callback: impl Fn(&Change<K, V>) + 'static) -> Subscription {
        dispatch!(self, m => m.subscribe(callback))
    }

    fn subscribe_count(&self, callback: impl Fn(usize) + 'static) -> Subscription {
        dispatch!(self, m => m.subscribe_count(callback))
    }

    fn try_add(&self, key: K, value: V) -> Result<(), DictionaryError> {
        dispatch!(self, m => m.try_add(key, value))
    }

    fn try_remove<Q>(&self, key: &Q) -> Result<bool, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        dispatch!(self, m => m.try_remove(key))
    }

    fn try_clear(&self) -> Result<(), DictionaryError> {
        dispatch!(self, m => m.try_clear())
    }
}
