// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::{FxHashMap, FxHashSet};
use crate::error::{DecodeError, OutOfRangeIndex};
use std::sync::Arc;

/// The strings of one profile, in wire order. Positions are kept exactly as
/// decoded because every index in the raw records depends on them, but equal
/// strings share a single allocation.
///
/// Index 0 is always the empty string, which means "no string".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StringTable {
    strings: Vec<Arc<str>>,
}

impl StringTable {
    /// Builds the table from the raw string list. An empty list is treated as
    /// a table holding only the empty string, which is how a profile without
    /// any strings gets encoded by some producers.
    pub fn intern<I, S>(raw: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = raw.into_iter();
        let mut seen: FxHashSet<Arc<str>> = FxHashSet::default();
        let mut strings = Vec::with_capacity(raw.size_hint().0.max(1));
        for string in raw {
            let string = string.as_ref();
            let interned = match seen.get(string) {
                Some(existing) => existing.clone(),
                None => {
                    let interned = Arc::<str>::from(string);
                    seen.insert(interned.clone());
                    interned
                }
            };
            strings.push(interned);
        }

        match strings.first() {
            None => strings.push(Arc::from("")),
            Some(first) if !first.is_empty() => {
                return Err(DecodeError::InvalidStringTable {
                    reason: "the first string must be empty",
                })
            }
            Some(_) => {}
        }
        // Index 0 has to be the only way to say "no string".
        if strings.iter().skip(1).any(|string| string.is_empty()) {
            return Err(DecodeError::InvalidStringTable {
                reason: "the empty string appears more than once",
            });
        }
        Ok(Self { strings })
    }

    /// Looks up the string at `index`, which is signed because that's how
    /// pprof stores string indices on the wire.
    pub fn resolve(&self, index: i64) -> Result<&Arc<str>, OutOfRangeIndex> {
        usize::try_from(index)
            .ok()
            .and_then(|offset| self.strings.get(offset))
            .ok_or(OutOfRangeIndex {
                index,
                len: self.strings.len(),
            })
    }

    pub fn get(&self, index: i64) -> Option<&str> {
        self.resolve(index).ok().map(|string| &**string)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Never true for a table built by [`StringTable::intern`], which always
    /// holds at least the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.strings.iter().map(|string| &**string)
    }
}

/// Interns strings back into a wire string list, for re-encoding a resolved
/// profile. The empty string is always at index 0.
#[derive(Debug)]
pub struct StringTableBuilder {
    strings: Vec<Arc<str>>,
    offsets: FxHashMap<Arc<str>, i64>,
}

impl Default for StringTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTableBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            strings: Vec::new(),
            offsets: FxHashMap::default(),
        };
        builder.intern("");
        builder
    }

    /// Seeds the builder with an existing table so its positions survive. A
    /// string that appears more than once keeps mapping to its first index.
    pub fn from_table(table: &StringTable) -> Self {
        let mut offsets = FxHashMap::default();
        for (offset, string) in table.strings.iter().enumerate() {
            offsets.entry(string.clone()).or_insert(offset as i64);
        }
        Self {
            strings: table.strings.clone(),
            offsets,
        }
    }

    pub fn intern(&mut self, string: &str) -> i64 {
        if let Some(offset) = self.offsets.get(string) {
            return *offset;
        }
        let offset = self.strings.len() as i64;
        let string = Arc::<str>::from(string);
        self.strings.push(string.clone());
        self.offsets.insert(string, offset);
        offset
    }

    pub fn finish(self) -> Vec<String> {
        self.strings.iter().map(|string| string.to_string()).collect()
    }
}
