// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::report::Finding;

/// A string-table index with no backing entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("string index {index} is out of range (table length {len})")]
pub struct OutOfRangeIndex {
    pub index: i64,
    pub len: usize,
}

impl OutOfRangeIndex {
    pub(crate) fn in_context(self, context: &'static str) -> DecodeError {
        DecodeError::OutOfRangeIndex {
            index: self.index,
            len: self.len,
            context,
        }
    }
}

/// Terminal errors of the pipeline. Anything recoverable is reported as a
/// [`Finding`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode pprof protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("invalid string table: {reason}")]
    InvalidStringTable { reason: &'static str },
    #[error("string index {index} is out of range (table length {len}) in {context}")]
    OutOfRangeIndex {
        index: i64,
        len: usize,
        context: &'static str,
    },
    #[error("profile rejected with {fatal_count} fatal finding(s), first: {first}")]
    Rejected { first: Finding, fatal_count: usize },
}
