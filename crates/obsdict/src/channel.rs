#![forbid(unsafe_code)]

//! Subscriber list with RAII unsubscription.
//!
//! # Design
//!
//! A [`Channel<T>`] holds its subscribers as `Weak` callback pointers. The
//! strong `Rc` lives inside the [`Subscription`] guard handed back to the
//! caller, so dropping the guard is all it takes to detach. Dead entries are
//! pruned lazily on the next [`Channel::emit`] or [`Channel::subscribe`].
//!
//! # Failure Modes
//!
//! - **Subscribe during emit**: the callback list is snapshotted before any
//!   callback runs, so a subscriber added from inside a callback is first
//!   called on the *next* emit.
//! - **Unsubscribe during emit**: the snapshot holds strong references, so a
//!   subscriber dropped from inside an earlier callback still runs for the
//!   current emit and stops on the next one.
//! - **Subscriber leak**: guards stored forever keep their callbacks alive.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// An ordered list of weakly held callbacks for events of type `T`.
///
/// Callbacks run in registration order.
pub(crate) struct Channel<T> {
    subscribers: RefCell<Vec<CallbackWeak<T>>>,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T> Channel<T> {
    /// Registered subscribers, including dead ones not yet pruned.
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: 'static> Channel<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and return the guard that keeps it alive.
    pub(crate) fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|w| w.strong_count() > 0);
        subscribers.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver `event` to every live subscriber and prune the dead ones.
    ///
    /// No borrow of the subscriber list is held while callbacks run.
    pub(crate) fn emit(&self, event: &T) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(event);
        }
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the guard releases the only strong reference to the callback, so
/// it is never invoked again. [`Subscription::unsubscribe`] does the same
/// thing explicitly.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    // Erased `Rc<dyn Fn(&T)>`; the channel only holds the matching `Weak`.
    _guard: Box<dyn Any>,
}

impl Subscription {
    /// Detach the callback now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
