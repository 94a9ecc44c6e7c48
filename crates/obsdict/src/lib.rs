#![forbid(unsafe_code)]

//! Observable dictionary: a key-value mapping that publishes its changes.
//!
//! - [`ObservableDictionary`]: the source of truth. Publishes a [`Change`]
//!   (Add / Remove / Reset) and the new count on every structural mutation,
//!   and exposes live [`Keys`] / [`Values`] sequences.
//! - [`ReadOnlyObservableDictionary`]: a relay that shares the dictionary's
//!   storage and sequences and re-publishes its notifications unchanged.
//!   Mutation through it fails with [`DictionaryError::ReadOnly`].
//! - [`ObservableMapping`]: the surface both implement, and
//!   [`ObservableMap`], the tagged union over the two.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Architecture
//!
//! Handles are `Rc`-based and single-threaded. Delivery is synchronous:
//! every subscriber has run before the mutating call returns. Subscribers are
//! held as `Weak` callbacks and pruned lazily during notification.
//!
//! # Invariants
//!
//! 1. `keys()[i]` and `values()[i]` describe the same entry.
//! 2. `count() == keys().len() == values().len()` before, after, and during
//!    every notification.
//! 3. Keys are unique; adding a present key publishes a removal first.
//! 4. Subscribers are notified in registration order: change subscribers,
//!    then count subscribers, then Keys and Values subscribers.
//!
//! ```
//! use obsdict::{ObservableDictionary, ObservableMapping};
//!
//! let dict: ObservableDictionary<&str, i32> = ObservableDictionary::new();
//! let view = dict.read_only();
//! let _sub = view.subscribe(|change| {
//!     println!("{:?}", change.action());
//! });
//!
//! dict.add("answer", 41);
//! dict.set("answer", 42);
//! assert_eq!(view.get("answer"), Ok(42));
//! assert_eq!(view.keys().to_vec(), ["answer"]);
//! ```

pub mod change;
mod channel;
pub mod dictionary;
pub mod error;
pub mod mapping;
pub mod sequence;
pub mod view;

pub use change::{Change, ChangeAction, SequenceChange};
pub use channel::Subscription;
pub use dictionary::{DictionaryConfig, ObservableDictionary};
pub use error::DictionaryError;
pub use mapping::{ObservableMap, ObservableMapping};
pub use sequence::{Keys, Values};
pub use view::ReadOnlyObservableDictionary;
