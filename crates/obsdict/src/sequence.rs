#![forbid(unsafe_code)]

//! Live, read-only projections of a dictionary's keys and values.
//!
//! [`Keys`] and [`Values`] are handles onto the dictionary's own storage, not
//! copies: position `i` of both always describes the same entry, and both
//! always have `count()` elements. Every handle obtained from a dictionary,
//! or from a view wrapping it, refers to the same sequence ([`Keys::ptr_eq`]).
//!
//! Each sequence has its own subscribers, notified with a
//! [`SequenceChange`] after the dictionary's change and count notifications.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::Equivalent;

use crate::change::SequenceChange;
use crate::channel::Subscription;
use crate::dictionary::Shared;

/// Insertion-ordered key sequence of an observable dictionary.
pub struct Keys<K, V> {
    shared: Rc<Shared<K, V>>,
}

/// Insertion-ordered value sequence of an observable dictionary.
pub struct Values<K, V> {
    shared: Rc<Shared<K, V>>,
}

impl<K, V> Clone for Keys<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K, V> Clone for Values<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_list().entries(state.entries.keys()).finish()
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_list().entries(state.entries.values()).finish()
    }
}

impl<K, V> Keys<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    pub(crate) fn new(shared: Rc<Shared<K, V>>) -> Self {
        Self { shared }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<K> {
        let state = self.shared.state.borrow();
        state.entries.get_index(index).map(|(k, _)| k.clone())
    }

    #[must_use]
    pub fn last(&self) -> Option<K> {
        let state = self.shared.state.borrow();
        state.entries.last().map(|(k, _)| k.clone())
    }

    /// Position of `key`. Keys are unique, so this is unambiguous.
    #[must_use]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.shared.state.borrow().entries.get_index_of(key)
    }

    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.shared.state.borrow().entries.contains_key(key)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<K> {
        self.shared.state.borrow().entries.keys().cloned().collect()
    }

    /// Whether both handles project the same dictionary.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn subscribe(&self, callback: impl Fn(&SequenceChange<K>) + 'static) -> Subscription {
        self.shared.key_changes.subscribe(callback)
    }
}

impl<K, V> Values<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    pub(crate) fn new(shared: Rc<Shared<K, V>>) -> Self {
        Self { shared }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<V> {
        let state = self.shared.state.borrow();
        state.entries.get_index(index).map(|(_, v)| v.clone())
    }

    #[must_use]
    pub fn last(&self) -> Option<V> {
        let state = self.shared.state.borrow();
        state.entries.last().map(|(_, v)| v.clone())
    }

    /// Position of the first occurrence of `value`.
    ///
    /// Distinct keys may hold equal values; this reports only the first.
    #[must_use]
    pub fn position(&self, value: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        self.shared
            .state
            .borrow()
            .entries
            .values()
            .position(|v| v == value)
    }

    #[must_use]
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.position(value).is_some()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<V> {
        self.shared.state.borrow().entries.values().cloned().collect()
    }

    /// Whether both handles project the same dictionary.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn subscribe(&self, callback: impl Fn(&SequenceChange<V>) + 'static) -> Subscription {
        self.shared.value_changes.subscribe(callback)
    }
}
