// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

/// The kind and unit of a sample value, e.g. "cpu" in "nanoseconds".
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ValueType {
    pub r#type: Arc<str>,
    pub unit: Arc<str>,
}

impl ValueType {
    pub fn new(r#type: &str, unit: &str) -> Self {
        Self {
            r#type: Arc::from(r#type),
            unit: Arc::from(unit),
        }
    }
}
