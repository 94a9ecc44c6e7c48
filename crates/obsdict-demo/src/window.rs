#![forbid(unsafe_code)]

//! Headless demonstration window.
//!
//! The window owns an `ObservableDictionary<String, String>` and binds its
//! display to a read-only view of it, the way a list control binds to a
//! collection. Buttons mutate the dictionary; the display learns about every
//! change only through the view's notifications.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No more keys | Add with all demo keys present | `DemoError::NoMoreKeys`, state unchanged |
//! | Empty | Remove / Modify with nothing to act on | `DemoError::Empty`, state unchanged |
//! | Unknown button | Unrecognized command name | `DemoError::UnknownButton` |

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;
use std::str::FromStr;

use obsdict::{
    Change, ChangeAction, Keys, ObservableDictionary, ObservableMapping,
    ReadOnlyObservableDictionary, Subscription, Values,
};
use obsdict_util::{PropertyError, property_values};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Keys handed out by the Add button, in order.
pub const DEMO_KEYS: [&str; 3] = ["Key1", "Key2", "Key3"];
/// Values handed out by the Add and Modify buttons.
pub const DEMO_VALUES: [&str; 3] = ["Val1", "Val2", "Val3"];

/// Errors surfaced by the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("unknown button: {0}")]
    UnknownButton(String),
    #[error("all demo keys are already present")]
    NoMoreKeys,
    #[error("the dictionary is empty")]
    Empty,
    #[error("status record: {0}")]
    Status(#[from] PropertyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemoError {
    /// Whether the demo can keep accepting presses after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// A button on the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Add,
    Remove,
    Modify,
    Clear,
    Status,
}

impl Button {
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Remove,
        Self::Modify,
        Self::Clear,
        Self::Status,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Modify => "modify",
            Self::Clear => "clear",
            Self::Status => "status",
        }
    }
}

impl FromStr for Button {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|button| button.label().eq_ignore_ascii_case(name))
            .ok_or_else(|| DemoError::UnknownButton(name.to_string()))
    }
}

/// Deterministic LCG behind the Modify button.
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        self.0
    }

    /// Uniform-ish pick from `0..bound`. `bound` must be non-zero.
    fn next_below(&mut self, bound: usize) -> usize {
        ((self.next_u64() >> 33) % bound as u64) as usize
    }
}

/// What the window shows. Fed only by notifications.
struct Binding {
    keys: Keys<String, String>,
    values: Values<String, String>,
    count: Rc<Cell<usize>>,
    last_action: Rc<Cell<Option<ChangeAction>>>,
    events: Rc<RefCell<Vec<String>>>,
    _subscriptions: [Subscription; 2],
}

impl Binding {
    fn attach(source: &impl ObservableMapping<String, String>) -> Self {
        let count = Rc::new(Cell::new(source.count()));
        let last_action = Rc::new(Cell::new(None));
        let events = Rc::new(RefCell::new(Vec::new()));

        let changes = {
            let last_action = Rc::clone(&last_action);
            let events = Rc::clone(&events);
            source.subscribe(move |change| {
                last_action.set(Some(change.action()));
                events.borrow_mut().push(describe(change));
            })
        };
        let counts = {
            let count = Rc::clone(&count);
            let events = Rc::clone(&events);
            source.subscribe_count(move |n| {
                count.set(n);
                events.borrow_mut().push(format!("count -> {n}"));
            })
        };

        Self {
            keys: source.keys(),
            values: source.values(),
            count,
            last_action,
            events,
            _subscriptions: [changes, counts],
        }
    }
}

fn describe(change: &Change<String, String>) -> String {
    match change {
        Change::Added { key, value } => format!("add {key}={value}"),
        Change::Removed { key, value, index } => format!("remove {key}={value} at {index}"),
        Change::Reset => "reset".to_string(),
    }
}

/// Snapshot reported by the Status button.
#[derive(Debug, Serialize)]
struct WindowStatus {
    count: usize,
    version: u64,
    last_action: Option<&'static str>,
    keys: Vec<String>,
}

/// The demo window: a dictionary, a read-only view of it, and a display
/// bound to the view.
pub struct DemoWindow {
    dictionary: ObservableDictionary<String, String>,
    view: ReadOnlyObservableDictionary<String, String>,
    binding: Binding,
    rng: Lcg,
}

impl DemoWindow {
    /// Create an empty window. `seed` drives the Modify button.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let dictionary = ObservableDictionary::new();
        let view = dictionary.read_only();
        let binding = Binding::attach(&view);
        Self {
            dictionary,
            view,
            binding,
            rng: Lcg(seed),
        }
    }

    /// The read-only view the display is bound to.
    #[must_use]
    pub fn view(&self) -> &ReadOnlyObservableDictionary<String, String> {
        &self.view
    }

    /// Press `button`. Returns text for buttons that produce output.
    pub fn press(&mut self, button: Button) -> Result<Option<String>, DemoError> {
        debug!(button = button.label(), "button pressed");
        match button {
            Button::Add => {
                let n = self.dictionary.count();
                let (Some(key), Some(value)) = (DEMO_KEYS.get(n), DEMO_VALUES.get(n)) else {
                    return Err(DemoError::NoMoreKeys);
                };
                self.dictionary.add((*key).to_string(), (*value).to_string());
            }
            Button::Remove => {
                let key = self.dictionary.keys().last().ok_or(DemoError::Empty)?;
                self.dictionary.remove(&key);
            }
            Button::Modify => {
                let key = self.dictionary.keys().last().ok_or(DemoError::Empty)?;
                let pick = self.rng.next_below(self.dictionary.count());
                self.dictionary.set(key, DEMO_VALUES[pick].to_string());
            }
            Button::Clear => self.dictionary.clear(),
            Button::Status => return self.status().map(Some),
        }
        Ok(None)
    }

    /// Status record as a single JSON object line.
    pub fn status(&self) -> Result<String, DemoError> {
        let record = WindowStatus {
            count: self.binding.count.get(),
            version: self.view.version(),
            last_action: self.binding.last_action.get().map(ChangeAction::as_str),
            keys: self.binding.keys.to_vec(),
        };
        let fields = property_values(&record)?;
        Ok(Value::Object(fields.into_iter().collect()).to_string())
    }

    /// Notification lines received since the last call.
    pub fn take_events(&self) -> Vec<String> {
        std::mem::take(&mut *self.binding.events.borrow_mut())
    }

    /// Render the bound display.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Keys:   [{}]", self.binding.keys.to_vec().join(", "));
        let _ = writeln!(out, "Values: [{}]", self.binding.values.to_vec().join(", "));
        let _ = write!(out, "Count:  {}", self.binding.count.get());
        out
    }
}

impl std::fmt::Debug for DemoWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoWindow")
            .field("dictionary", &self.dictionary)
            .field("count", &self.binding.count.get())
            .finish_non_exhaustive()
    }
}
