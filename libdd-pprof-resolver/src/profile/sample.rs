// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::{LabelValue, Location, Ref};
use indexmap::IndexMap;
use std::sync::Arc;

/// Values recorded in one program context. The call stack is leaf-first and
/// there is one value per declared sample type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sample {
    pub locations: Vec<Ref<Location>>,
    pub values: Vec<i64>,
    /// Keys in first-seen order. More than one value per key is possible on
    /// the wire but most tools handle it poorly.
    pub labels: IndexMap<Arc<str>, Vec<LabelValue>>,
}

impl Sample {
    pub fn label(&self, key: &str) -> Option<&LabelValue> {
        self.labels.get(key).and_then(|values| values.first())
    }
}
