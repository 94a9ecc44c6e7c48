#![forbid(unsafe_code)]

//! Read-only relay over an [`ObservableDictionary`].
//!
//! A view owns no storage. Its [`keys`](ObservableMapping::keys),
//! [`values`](ObservableMapping::values), and lookups read the wrapped
//! dictionary directly, and its subscribers receive exactly the change and
//! count notifications the dictionary publishes, in the same order, with
//! nothing added.
//!
//! Mutation through a view is rejected with [`DictionaryError::ReadOnly`].
//! Only the dictionary's own mutators write its storage.
//!
//! The relay is attached when the view is built and detached when the last
//! clone of the view is dropped.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::Equivalent;
use tracing::debug;

use crate::change::Change;
use crate::channel::{Channel, Subscription};
use crate::dictionary::ObservableDictionary;
use crate::error::DictionaryError;
use crate::mapping::{ObservableMap, ObservableMapping};
use crate::sequence::{Keys, Values};

struct Relay<K, V> {
    changes: Rc<Channel<Change<K, V>>>,
    counts: Rc<Channel<usize>>,
    // Guards on the source's channels; dropping them detaches the relay.
    _links: [Subscription; 2],
}

impl<K, V> Drop for Relay<K, V> {
    fn drop(&mut self) {
        debug!("read-only view detached");
    }
}

/// Read-only view of an [`ObservableDictionary`].
///
/// Cloning a view creates another handle to the same relay, so subscribers
/// registered through any clone see every notification.
pub struct ReadOnlyObservableDictionary<K, V> {
    source: ObservableDictionary<K, V>,
    relay: Rc<Relay<K, V>>,
}

impl<K, V> ReadOnlyObservableDictionary<K, V> {
    pub(crate) const KIND: &'static str = "read-only";
}

impl<K, V> Clone for ReadOnlyObservableDictionary<K, V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            relay: Rc::clone(&self.relay),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ReadOnlyObservableDictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyObservableDictionary")
            .field("source", &self.source)
            .field("subscriber_count", &self.relay.changes.subscriber_count())
            .finish()
    }
}

impl<K, V> Default for ReadOnlyObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TryFrom<ObservableMap<K, V>> for ReadOnlyObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    type Error = DictionaryError;

    /// Only a mutable dictionary can back a view.
    fn try_from(map: ObservableMap<K, V>) -> Result<Self, Self::Error> {
        match map {
            ObservableMap::Mutable(dictionary) => Ok(Self::wrap(&dictionary)),
            other => Err(DictionaryError::TypeMismatch {
                expected: ObservableDictionary::<K, V>::KIND,
                found: other.kind(),
            }),
        }
    }
}

impl<K, V> ReadOnlyObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    /// A view over a fresh dictionary that only this view (and its clones)
    /// can reach.
    ///
    /// Views reject mutation, so the result stays empty for its whole life.
    /// Use [`wrap`](Self::wrap) or [`ObservableDictionary::read_only`] to
    /// observe a dictionary that something else fills.
    #[must_use]
    pub fn new() -> Self {
        Self::wrap(&ObservableDictionary::new())
    }

    /// Attach a view to `source`.
    #[must_use]
    pub fn wrap(source: &ObservableDictionary<K, V>) -> Self {
        let changes = Rc::new(Channel::new());
        let counts = Rc::new(Channel::new());

        let change_target = Rc::clone(&changes);
        let change_link = source.subscribe(move |change| change_target.emit(change));
        let count_target = Rc::clone(&counts);
        let count_link = source.subscribe_count(move |count| count_target.emit(&count));

        debug!(
            source_subscribers = source.subscriber_count(),
            "read-only view attached"
        );
        Self {
            source: source.clone(),
            relay: Rc::new(Relay {
                changes,
                counts,
                _links: [change_link, count_link],
            }),
        }
    }

    /// Whether this view relays `dictionary`.
    #[must_use]
    pub fn source_ptr_eq(&self, dictionary: &ObservableDictionary<K, V>) -> bool {
        self.source.ptr_eq(dictionary)
    }

    /// Number of registered change subscribers on the view, including dead
    /// ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.relay.changes.subscriber_count()
    }
}

impl<K, V> ObservableMapping<K, V> for ReadOnlyObservableDictionary<K, V>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    fn get<Q>(&self, key: &Q) -> Result<V, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.source.get(key)
    }

    fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.source.try_get(key)
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.source.contains_key(key)
    }

    fn count(&self) -> usize {
        self.source.count()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.source.entries()
    }

    fn for_each(&self, f: impl FnMut(&K, &V)) {
        self.source.for_each(f);
    }

    fn keys(&self) -> Keys<K, V> {
        self.source.keys()
    }

    fn values(&self) -> Values<K, V> {
        self.source.values()
    }

    fn version(&self) -> u64 {
        self.source.version()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn subscribe(&self, callback: impl Fn(&Change<K, V>) + 'static) -> Subscription {
        self.relay.changes.subscribe(callback)
    }

    fn subscribe_count(&self, callback: impl Fn(usize) + 'static) -> Subscription {
        self.relay.counts.subscribe(move |count: &usize| callback(*count))
    }

    fn try_add(&self, _key: K, _value: V) -> Result<(), DictionaryError> {
        Err(DictionaryError::ReadOnly)
    }

    fn try_remove<Q>(&self, _key: &Q) -> Result<bool, DictionaryError>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        Err(DictionaryError::ReadOnly)
    }

    fn try_clear(&self) -> Result<(), DictionaryError> {
        Err(DictionaryError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn view_reads_through() {
        let dict = ObservableDictionary::<String, i32>::new();
        let view = dict.read_only();
        dict.add("a".to_string(), 1);
        assert_eq!(view.get("a"), Ok(1));
        assert_eq!(view.count(), 1);
        assert_eq!(view.entries(), dict.entries());
        assert_eq!(view.version(), dict.version());
    }

    #[test]
    fn view_shares_projections() {
        let dict = ObservableDictionary::<String, i32>::new();
        let view = ReadOnlyObservableDictionary::wrap(&dict);
        assert!(view.keys().ptr_eq(&dict.keys()));
        assert!(view.values().ptr_eq(&dict.values()));
        assert!(view.source_ptr_eq(&dict));
    }

    #[test]
    fn view_rejects_mutation() {
        let dict = ObservableDictionary::new();
        dict.add("a".to_string(), 1);
        let view = dict.read_only();
        let relayed = Rc::new(Cell::new(0u32));
        let relayed_clone = Rc::clone(&relayed);
        let _sub = view.subscribe(move |_| relayed_clone.set(relayed_clone.get() + 1));

        assert!(view.is_read_only());
        assert!(!dict.is_read_only());
        assert_eq!(view.try_add("b".to_string(), 2), Err(DictionaryError::ReadOnly));
        assert_eq!(view.try_remove("a"), Err(DictionaryError::ReadOnly));
        assert_eq!(view.try_clear(), Err(DictionaryError::ReadOnly));

        assert_eq!(dict.entries(), vec![("a".to_string(), 1)]);
        assert_eq!(relayed.get(), 0);
        assert_eq!(dict.version(), 1);
    }

    #[test]
    fn relay_forwards_changes_and_counts() {
        let dict = ObservableDictionary::<String, i32>::new();
        let view = dict.read_only();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let counts = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = Rc::clone(&changes);
        let _c = view.subscribe(move |c| changes_clone.borrow_mut().push(c.clone()));
        let counts_clone = Rc::clone(&counts);
        let _n = view.subscribe_count(move |n| counts_clone.borrow_mut().push(n));

        dict.add("a".to_string(), 1);
        dict.clear();

        assert_eq!(
            *changes.borrow(),
            vec![
                Change::Added {
                    key: "a".to_string(),
                    value: 1
                },
                Change::Reset
            ]
        );
        assert_eq!(*counts.borrow(), vec![1, 0]);
    }

    #[test]
    fn dropping_view_detaches_relay() {
        let dict = ObservableDictionary::<String, i32>::new();
        let view = dict.read_only();
        let clone = view.clone();
        drop(view);
        dict.add("a".to_string(), 1);
        // The clone still holds the relay.
        assert_eq!(dict.subscriber_count(), 1);

        drop(clone);
        dict.add("b".to_string(), 2);
        assert_eq!(dict.subscriber_count(), 0);
    }

    #[test]
    fn default_view_owns_fresh_dictionary() {
        let view = ReadOnlyObservableDictionary::<String, i32>::default();
        assert!(view.is_empty());
        assert!(view.keys().is_empty());
        assert_eq!(view.get("x"), Err(DictionaryError::KeyNotFound));
    }

    #[test]
    fn clones_share_subscribers() {
        let dict = ObservableDictionary::<String, i32>::new();
        let view = dict.read_only();
        let clone = view.clone();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = clone.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));
        assert_eq!(view.subscriber_count(), 1);

        dict.add("a".to_string(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn new_view_stays_empty() {
        let view = ReadOnlyObservableDictionary::<String, i32>::new();
        assert_eq!(view.try_add("a".to_string(), 1), Err(DictionaryError::ReadOnly));
        assert!(view.is_empty());
        assert_eq!(view.version(), 0);
    }

    #[test]
    fn dropped_views_do_not_accumulate_on_idle_source() {
        let dict = ObservableDictionary::<String, i32>::new();
        for _ in 0..1000 {
            drop(dict.read_only());
        }
        let _live = dict.read_only();
        assert_eq!(dict.subscriber_count(), 1);
    }

    #[test]
    fn debug_reports_entries_and_subscribers() {
        let dict = ObservableDictionary::<String, i32>::from_entries([("a".to_string(), 1)]);
        let view = dict.read_only();
        let _sub = view.subscribe(|_| {});

        let dict_debug = format!("{dict:?}");
        assert!(dict_debug.contains(r#""a": 1"#), "{dict_debug}");
        assert!(dict_debug.contains("subscriber_count: 1"), "{dict_debug}");
        let view_debug = format!("{view:?}");
        assert!(view_debug.starts_with("ReadOnlyObservableDictionary"));
        assert!(view_debug.contains("subscriber_count: 1"), "{view_debug}");
    }
}
