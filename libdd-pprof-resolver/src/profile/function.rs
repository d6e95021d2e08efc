// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Function {
    pub id: u64,
    /// Human-readable name, if available.
    pub name: Arc<str>,
    /// Name as identified by the system, e.g. a C++ mangled name.
    pub system_name: Arc<str>,
    pub filename: Arc<str>,
    pub start_line: i64,
}
