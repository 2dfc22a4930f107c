//! Flat key narrowing over an ordered [`Map`]. Both helpers keep the
//! original key order among the retained entries; requested keys that are
//! not present are ignored.

use crate::value::Map;

/// Keep only the entries whose key is listed in `keys`.
pub fn only<S: AsRef<str>>(map: &Map, keys: &[S]) -> Map {
    map.iter()
        .filter(|(k, _)| keys.iter().any(|key| key.as_ref() == k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Drop every entry whose key is listed in `keys`.
pub fn except<S: AsRef<str>>(map: &Map, keys: &[S]) -> Map {
    map.iter()
        .filter(|(k, _)| !keys.iter().any(|key| key.as_ref() == k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
