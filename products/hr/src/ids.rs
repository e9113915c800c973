//! Employee identifier policy.
//!
//! New identifiers are epoch milliseconds rendered as decimal text. The
//! generator never hands out a value at or below the highest numeric id it
//! has issued or seen, so two additions within the same millisecond still get
//! distinct ids. Records loaded without an id get a `legacy-` id instead.

use std::collections::HashSet;

/// Stored ids above this are not treated as issued timestamps.
const MAX_OBSERVED: u64 = i64::MAX as u64;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    /// Records an existing id so later ids sort after it.
    pub(crate) fn observe(&mut self, id: &str) {
        if let Some(value) = id.parse::<u64>().ok().filter(|v| *v <= MAX_OBSERVED) {
            self.last = Some(self.last.map_or(value, |last| last.max(value)));
        }
    }

    pub(crate) fn next(&mut self, now_millis: i64) -> String {
        let now = u64::try_from(now_millis).unwrap_or(0);
        let value = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(value);
        value.to_string()
    }
}

/// Id for a stored record that has none, skipping any id already in `taken`.
pub(crate) fn legacy_id(now_millis: i64, index: usize, taken: &HashSet<String>) -> String {
    let base = format!("legacy-{now_millis}-{index}");
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|suffix| format!("{base}-{suffix}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}
