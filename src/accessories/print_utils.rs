//! Compact string representations of lists and maps.

use std::fmt::Display;

use crate::error::{AccessoryError, Result};

/// Render a list without commas, eliding the middle of long lists:
/// `[1, 2, 3, 4, 5, 6, 7]` with `max_len = 6` gives `"[ 1 2 3 ... 5 6 7]"`.
///
/// Lists longer than `max_len` keep their first `max_len - max_len / 2` and
/// last `max_len / 2` items. `max_len` has to be > 1.
pub fn pretty_list<T: Display>(items: &[T], max_len: usize) -> Result<String> {
    if max_len <= 1 {
        return Err(AccessoryError::InvalidMaxLen(max_len));
    }
    let parts: Vec<String> = if items.len() > max_len {
        let right = max_len / 2;
        let left = max_len - right;
        items[..left]
            .iter()
            .map(|item| item.to_string())
            .chain(std::iter::once("...".to_string()))
            .chain(items[items.len() - right..].iter().map(|item| item.to_string()))
            .collect()
    } else {
        items.iter().map(|item| item.to_string()).collect()
    };
    Ok(format!("[ {}]", parts.join(" ")))
}

/// Render key/value pairs sorted by key:
/// `{'c': 39, 'ded': 2, 'aa': 21}` gives `"{ aa: 21, c: 39, ded: 2,}"`.
pub fn pretty_dict<K, V, I>(entries: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Display + Ord,
    V: Display,
{
    let mut entries: Vec<(K, V)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let mut out = String::from("{");
    for (k, v) in entries {
        out.push_str(&format!(" {}: {},", k, v));
    }
    out.push('}');
    out
}
