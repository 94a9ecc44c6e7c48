#![forbid(unsafe_code)]

//! Stateless helpers around observable dictionaries.
//!
//! - [`property_values`]: a record's named fields as an ordered mapping,
//!   ready to seed an `ObservableDictionary`.
//! - [`merge_all`]: combine several mappings, first-listed wins.
//! - [`translate_keys`]: rename keys through a lookup table.

pub mod merge;
pub mod properties;

pub use merge::{merge_all, translate_keys};
pub use properties::{PropertyError, PropertyMap, property_values};
