// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

/// A binary (or virtual object such as `[vdso]`) loaded into the profiled
/// process.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Mapping {
    pub id: u64,
    pub memory_start: u64,
    pub memory_limit: u64,
    /// Offset in the binary that corresponds to the first mapped address.
    pub file_offset: u64,
    pub filename: Arc<str>,
    pub build_id: Arc<str>,
    pub has_functions: bool,
    pub has_filenames: bool,
    pub has_line_numbers: bool,
    pub has_inline_frames: bool,
}

impl Mapping {
    #[inline]
    pub fn has_valid_range(&self) -> bool {
        self.memory_start <= self.memory_limit
    }

    /// Whether `address` falls in `[memory_start, memory_limit)`.
    #[inline]
    pub fn contains(&self, address: u64) -> bool {
        (self.memory_start..self.memory_limit).contains(&address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(memory_start: u64, memory_limit: u64) -> Mapping {
        Mapping {
            id: 1,
            memory_start,
            memory_limit,
            file_offset: 0,
            filename: Arc::from("/usr/lib/libc.so.6"),
            build_id: Arc::from(""),
            has_functions: true,
            has_filenames: false,
            has_line_numbers: false,
            has_inline_frames: false,
        }
    }

    #[test]
    fn half_open_range() {
        let mapping = mapping(0x1000, 0x2000);
        assert!(mapping.has_valid_range());
        assert!(mapping.contains(0x1000));
        assert!(mapping.contains(0x1fff));
        assert!(!mapping.contains(0x2000));
        assert!(!mapping.contains(0xfff));
    }

    #[test]
    fn inverted_range() {
        let mapping = mapping(0x2000, 0x1000);
        assert!(!mapping.has_valid_range());
        assert!(!mapping.contains(0x1800));
    }
}
