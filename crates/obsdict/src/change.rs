#![forbid(unsafe_code)]

//! Notification payloads.
//!
//! A dictionary speaks exactly three change kinds. Overwriting a key is
//! reported as a [`Change::Removed`] followed by a [`Change::Added`], never as
//! an update.

/// The kind of a [`Change`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Add,
    Remove,
    Reset,
}

impl ChangeAction {
    /// Stable lowercase name, used as a structured log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Reset => "reset",
        }
    }
}

/// A structural change to an observable mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<K, V> {
    /// An entry was appended at the end of iteration order.
    Added { key: K, value: V },
    /// An entry was removed. `index` is its position in iteration order
    /// immediately before removal.
    Removed { key: K, value: V, index: usize },
    /// Every entry was removed at once. Carries no per-entry payload.
    Reset,
}

impl<K, V> Change<K, V> {
    #[must_use]
    pub fn action(&self) -> ChangeAction {
        match self {
            Self::Added { .. } => ChangeAction::Add,
            Self::Removed { .. } => ChangeAction::Remove,
            Self::Reset => ChangeAction::Reset,
        }
    }

    /// Key and value carried by the change, if any.
    #[must_use]
    pub fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Self::Added { key, value } | Self::Removed { key, value, .. } => Some((key, value)),
            Self::Reset => None,
        }
    }

    /// Index hint of a removal.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Removed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// A change to one of the derived [`Keys`](crate::Keys) /
/// [`Values`](crate::Values) sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceChange<T> {
    Inserted { index: usize, item: T },
    Removed { index: usize, item: T },
    Cleared,
}

impl<K: Clone, V: Clone> Change<K, V> {
    /// Project this change onto the Keys sequence. `len_after` is the
    /// dictionary size once the change has been applied.
    pub(crate) fn key_change(&self, len_after: usize) -> SequenceChange<K> {
        match self {
            Self::Added { key, .. } => SequenceChange::Inserted {
                index: len_after - 1,
                item: key.clone(),
            },
            Self::Removed { key, index, .. } => SequenceChange::Removed {
                index: *index,
                item: key.clone(),
            },
            Self::Reset => SequenceChange::Cleared,
        }
    }

    /// Project this change onto the Values sequence.
    pub(crate) fn value_change(&self, len_after: usize) -> SequenceChange<V> {
        match self {
            Self::Added { value, .. } => SequenceChange::Inserted {
                index: len_after - 1,
                item: value.clone(),
            },
            Self::Removed { value, index, .. } => SequenceChange::Removed {
                index: *index,
                item: value.clone(),
            },
            Self::Reset => SequenceChange::Cleared,
        }
    }
}
