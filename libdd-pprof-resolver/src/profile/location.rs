// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::{Function, Mapping, Ref};

/// One frame of source information. The function is looked up by id, so it
/// may be unresolved in a partially symbolized profile.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Line {
    pub function: Ref<Function>,
    pub line: i64,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    pub id: u64,
    /// `None` when the location has no mapping at all, which is different
    /// from a mapping id that points nowhere.
    pub mapping: Option<Ref<Mapping>>,
    pub address: u64,
    /// Innermost first: with inlining, `lines[0]` is the leaf frame and the
    /// last line is the caller everything else was inlined into.
    pub lines: Vec<Line>,
    /// Multiple symbols map to this address, e.g. identical code folding.
    pub is_folded: bool,
}

impl Location {
    /// The innermost line, if any.
    pub fn leaf(&self) -> Option<&Line> {
        self.lines.first()
    }
}
