#![forbid(unsafe_code)]

//! Combine mappings and rename keys.

use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use tracing::debug;

/// Merge `maps` into one mapping. On a key conflict the **first-listed**
/// map wins.
///
/// Maps are applied last to first, so the result lists the last map's keys
/// first; a key keeps the position where it was first inserted.
///
/// ```
/// use indexmap::IndexMap;
/// use obsdict_util::merge_all;
///
/// let defaults = IndexMap::from([("color", "red"), ("size", "m")]);
/// let overrides = IndexMap::from([("color", "blue")]);
/// let merged = merge_all([overrides, defaults]);
/// assert_eq!(merged["color"], "blue");
/// assert_eq!(merged["size"], "m");
/// ```
pub fn merge_all<K, V, M, I>(maps: I) -> IndexMap<K, V>
where
    K: Eq + Hash,
    M: IntoIterator<Item = (K, V)>,
    I: IntoIterator<Item = M>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut merged = IndexMap::new();
    for map in maps.into_iter().rev() {
        merged.extend(map);
    }
    merged
}

/// Copy `map`, replacing every key found in `renames` with its new name.
///
/// Keys without an entry in `renames` pass through unchanged. When two
/// entries end up under the same key, the one visited later supplies the
/// value and the earlier one keeps its position.
pub fn translate_keys<K, V, S>(
    map: impl IntoIterator<Item = (K, V)>,
    renames: &IndexMap<K, K, S>,
) -> IndexMap<K, V>
where
    K: Clone + Eq + Hash,
    S: BuildHasher,
{
    let mut renamed = 0usize;
    let translated: IndexMap<K, V> = map
        .into_iter()
        .map(|(key, value)| match renames.get(&key) {
            Some(new_key) => {
                renamed += 1;
                (new_key.clone(), value)
            }
            None => (key, value),
        })
        .collect();
    debug!(renamed, entries = translated.len(), "translated mapping keys");
    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn first_listed_wins() {
        let a = IndexMap::from([("k", 1), ("only_a", 10)]);
        let b = IndexMap::from([("k", 2), ("only_b", 20)]);
        let c = IndexMap::from([("k", 3)]);

        let merged = merge_all([a, b, c]);
        assert_eq!(merged["k"], 1);
        assert_eq!(merged["only_a"], 10);
        assert_eq!(merged["only_b"], 20);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_order_starts_from_last_map() {
        let a = vec![("a", 1)];
        let b = vec![("b", 2), ("a", 0)];
        let merged = merge_all([a, b]);
        let keys: Vec<&str> = merged.keys().copied().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn merge_accepts_borrowed_maps() {
        let a: HashMap<&str, i32> = HashMap::from([("x", 1)]);
        let b: HashMap<&str, i32> = HashMap::from([("x", 2), ("y", 3)]);
        let merged = merge_all([&a, &b]);
        assert_eq!(merged[&"x"], &1);
        assert_eq!(merged[&"y"], &3);
    }

    #[test]
    fn merge_nothing_is_empty() {
        let merged: IndexMap<&str, i32> = merge_all(Vec::<Vec<(&str, i32)>>::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn translate_renames_listed_keys() {
        let map = IndexMap::from([("fname", "Ada"), ("age", "36")]);
        let renames = IndexMap::from([("fname", "first_name")]);
        let translated = translate_keys(map, &renames);
        let keys: Vec<&str> = translated.keys().copied().collect();
        assert_eq!(keys, ["first_name", "age"]);
        assert_eq!(translated["first_name"], "Ada");
    }

    #[test]
    fn translate_collision_later_value_wins() {
        let map = IndexMap::from([("a", 1), ("b", 2)]);
        let renames = IndexMap::from([("a", "b")]);
        let translated = translate_keys(map, &renames);
        assert_eq!(translated.len(), 1);
        assert_eq!(translated["b"], 2);
    }
}
