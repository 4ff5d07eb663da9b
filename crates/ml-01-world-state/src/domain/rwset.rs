//! # Read/Write Sets
//!
//! What a transaction observed and intends to change, plus the commit-time
//! validation that turns concurrent writers into conflicts instead of lost
//! updates.

use super::{Version, VersionedValue, WorldStateError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Half-open key range `[start_key, end_key)`. An empty bound is unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub start_key: String,
    pub end_key: String,
}

impl KeyRange {
    pub fn new(start_key: impl Into<String>, end_key: impl Into<String>) -> Self {
        Self {
            start_key: start_key.into(),
            end_key: end_key.into(),
        }
    }

    /// The whole key space.
    pub fn full() -> Self {
        Self::new("", "")
    }

    /// True when both bounds are set and no key can fall between them.
    pub fn is_void(&self) -> bool {
        !self.start_key.is_empty() && !self.end_key.is_empty() && self.start_key >= self.end_key
    }

    /// Bounds for `BTreeMap::range`, starting strictly after `resume_after`
    /// when given.
    ///
    /// Callers must check `is_void` first; `BTreeMap::range` panics on an
    /// inverted range.
    pub fn bounds<'a>(&'a self, resume_after: Option<&'a str>) -> (Bound<&'a str>, Bound<&'a str>) {
        let start = match resume_after {
            Some(key) => Bound::Excluded(key),
            None if self.start_key.is_empty() => Bound::Unbounded,
            None => Bound::Included(self.start_key.as_str()),
        };
        let end = if self.end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(self.end_key.as_str())
        };
        (start, end)
    }
}

/// Record of one range scan, finalised when its iterator is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQueryInfo {
    pub range: KeyRange,
    /// Committed entries the iterator passed over, in key order.
    pub observed: Vec<(String, Version)>,
    /// Last key handed to the caller, from either committed state or the
    /// transaction's own writes.
    pub last_key: Option<String>,
    /// The caller drained the iterator to the end of the range.
    pub exhausted: bool,
}

impl RangeQueryInfo {
    pub fn new(range: KeyRange) -> Self {
        Self {
            range,
            observed: Vec::new(),
            last_key: None,
            exhausted: false,
        }
    }
}

/// Everything a transaction read and wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadWriteSet {
    /// Key -> version observed at first read (`None` = key was absent).
    pub reads: BTreeMap<String, Option<Version>>,
    /// Key -> pending value.
    pub writes: BTreeMap<String, Vec<u8>>,
    pub range_queries: Vec<RangeQueryInfo>,
}

impl ReadWriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a point read. Only the first read of a key counts.
    pub fn record_read(&mut self, key: &str, version: Option<Version>) {
        self.reads.entry(key.to_string()).or_insert(version);
    }

    pub fn record_write(&mut self, key: &str, value: Vec<u8>) {
        self.writes.insert(key.to_string(), value);
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }

    /// Validate this set against the currently committed state.
    pub fn validate(&self, committed: &BTreeMap<String, VersionedValue>) -> Result<(), WorldStateError> {
        validate_reads(&self.reads, committed)?;
        for info in &self.range_queries {
            validate_range_query(info, committed)?;
        }
        Ok(())
    }
}

/// Every key read must still carry the version that was read.
pub fn validate_reads(
    reads: &BTreeMap<String, Option<Version>>,
    committed: &BTreeMap<String, VersionedValue>,
) -> Result<(), WorldStateError> {
    for (key, read_version) in reads {
        let committed_version = committed.get(key).map(|v| v.version);
        if committed_version != *read_version {
            return Err(WorldStateError::MvccReadConflict {
                key: key.clone(),
                read_version: *read_version,
                committed_version,
            });
        }
    }
    Ok(())
}

/// Re-run a recorded range scan over committed state.
///
/// An exhausted scan must see exactly the same keys and versions across the
/// whole range. A scan the caller stopped early is only checked up to the
/// last key it handed out.
pub fn validate_range_query(
    info: &RangeQueryInfo,
    committed: &BTreeMap<String, VersionedValue>,
) -> Result<(), WorldStateError> {
    if info.range.is_void() {
        return Ok(());
    }
    if !info.exhausted && info.last_key.is_none() {
        return Ok(());
    }

    let last_key = info.last_key.as_deref();
    let current: Vec<(&str, Version)> = committed
        .range::<str, _>(info.range.bounds(None))
        .take_while(|(key, _)| info.exhausted || last_key.is_some_and(|last| key.as_str() <= last))
        .map(|(key, value)| (key.as_str(), value.version))
        .collect();
    let observed: Vec<(&str, Version)> = info
        .observed
        .iter()
        .map(|(key, version)| (key.as_str(), *version))
        .collect();

    if current != observed {
        return Err(WorldStateError::PhantomReadConflict {
            start_key: info.range.start_key.clone(),
            end_key: info.range.end_key.clone(),
        });
    }
    Ok(())
}
