// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum LabelValue {
    Str(Arc<str>),
    Num { num: i64, unit: Option<Arc<str>> },
}

impl LabelValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LabelValue::Str(str) => Some(&**str),
            LabelValue::Num { .. } => None,
        }
    }

    pub fn as_num(&self) -> Option<i64> {
        match self {
            LabelValue::Str(_) => None,
            LabelValue::Num { num, .. } => Some(*num),
        }
    }
}

/// A label with its string indices resolved but its shape untouched: which
/// of the wire fields were set is still visible, so a malformed label can
/// be reported before it is turned into a [`LabelValue`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LabelSlots {
    pub key: Arc<str>,
    pub str: Option<Arc<str>>,
    pub num: Option<i64>,
    pub num_unit: Option<Arc<str>>,
}

impl LabelSlots {
    /// Exactly one of the string and the number is set.
    #[inline]
    pub fn has_valid_variant(&self) -> bool {
        self.str.is_some() != self.num.is_some()
    }

    /// A unit only ever comes with a number.
    #[inline]
    pub fn has_valid_unit(&self) -> bool {
        self.num_unit.is_none() || self.num.is_some()
    }

    pub fn value(&self) -> Option<LabelValue> {
        if !self.has_valid_variant() || !self.has_valid_unit() {
            return None;
        }
        match (&self.str, self.num) {
            (Some(str), None) => Some(LabelValue::Str(str.clone())),
            (None, Some(num)) => Some(LabelValue::Num {
                num,
                unit: self.num_unit.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(str: Option<&str>, num: Option<i64>, num_unit: Option<&str>) -> LabelSlots {
        LabelSlots {
            key: Arc::from("thread id"),
            str: str.map(Arc::from),
            num,
            num_unit: num_unit.map(Arc::from),
        }
    }

    #[test]
    fn string_label() {
        let label = slots(Some("main"), None, None);
        assert_eq!(Some(LabelValue::Str(Arc::from("main"))), label.value());
    }

    #[test]
    fn numeric_label_with_unit() {
        let label = slots(None, Some(512), Some("bytes"));
        let value = label.value().unwrap();
        assert_eq!(Some(512), value.as_num());
        assert_eq!(None, value.as_str());
    }

    #[test]
    fn both_or_neither() {
        let both = slots(Some("main"), Some(1), None);
        assert!(!both.has_valid_variant());
        assert_eq!(None, both.value());

        let neither = slots(None, None, None);
        assert!(!neither.has_valid_variant());
        assert_eq!(None, neither.value());
    }

    #[test]
    fn unit_without_number() {
        let label = slots(Some("main"), None, Some("bytes"));
        assert!(label.has_valid_variant());
        assert!(!label.has_valid_unit());
        assert_eq!(None, label.value());
    }
}
