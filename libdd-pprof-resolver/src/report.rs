// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// How bad a [`Finding`] is. Callers decide what to do with each level; the
/// default [`crate::DecodeOptions`] reject any `Fatal` finding.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Fatal => f.write_str("fatal"),
        }
    }
}

/// The id spaces of a profile.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntityKind {
    Mapping,
    Function,
    Location,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Mapping => f.write_str("mapping"),
            EntityKind::Function => f.write_str("function"),
            EntityKind::Location => f.write_str("location"),
        }
    }
}

/// A broken rule found while resolving or validating. Samples are named by
/// their offset in the profile since they carry no id.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("referenced {kind} id {id} does not exist")]
    DanglingReference { kind: EntityKind, id: u64 },
    #[error("{kind} id {id} is used more than once")]
    DuplicateId { kind: EntityKind, id: u64 },
    #[error("{kind} at offset {offset} has a zero id")]
    InvalidId { kind: EntityKind, offset: usize },
    #[error("sample {sample} has {actual} value(s) but the profile declares {expected} sample type(s)")]
    ValueArityMismatch {
        sample: usize,
        expected: usize,
        actual: usize,
    },
    #[error("mapping {id} starts at {memory_start:#x}, past its limit {memory_limit:#x}")]
    InvalidMappingRange {
        id: u64,
        memory_start: u64,
        memory_limit: u64,
    },
    #[error("function {id} has a negative start line {start_line}")]
    InvalidStartLine { id: u64, start_line: i64 },
    #[error("location {location_id} address {address:#x} is outside mapping {mapping_id} [{memory_start:#x}, {memory_limit:#x})")]
    AddressOutOfMappingRange {
        location_id: u64,
        address: u64,
        mapping_id: u64,
        memory_start: u64,
        memory_limit: u64,
    },
    #[error("label `{key}` on sample {sample} must have exactly one of a string or a number")]
    InvalidLabelVariant { sample: usize, key: Arc<str> },
    #[error("label `{key}` on sample {sample} has a unit but no number")]
    InvalidLabelUnit { sample: usize, key: Arc<str> },
}

impl Violation {
    pub fn default_severity(&self) -> Severity {
        match self {
            Violation::DanglingReference { .. } | Violation::AddressOutOfMappingRange { .. } => {
                Severity::Warning
            }
            _ => Severity::Fatal,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Finding {
    pub severity: Severity,
    pub violation: Violation,
}

impl Finding {
    /// Creates a finding with the violation's default severity.
    pub fn new(violation: Violation) -> Self {
        Self {
            severity: violation.default_severity(),
            violation,
        }
    }

    pub fn with_severity(violation: Violation, severity: Severity) -> Self {
        Self {
            severity,
            violation,
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.violation)
    }
}

/// Every finding of one decode, in a deterministic order: dangling
/// references in resolution order, then the validator's passes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    #[inline]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| !finding.is_fatal())
    }

    pub fn has_fatal(&self) -> bool {
        self.findings.iter().any(Finding::is_fatal)
    }

    pub(crate) fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

impl Extend<Finding> for ValidationReport {
    fn extend<T: IntoIterator<Item = Finding>>(&mut self, iter: T) {
        self.findings.extend(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_severities() {
        let dangling = Violation::DanglingReference {
            kind: EntityKind::Location,
            id: 99,
        };
        assert_eq!(Severity::Warning, dangling.default_severity());

        let duplicate = Violation::DuplicateId {
            kind: EntityKind::Mapping,
            id: 3,
        };
        assert_eq!(Severity::Fatal, duplicate.default_severity());
    }

    #[test]
    fn display() {
        let finding = Finding::new(Violation::DanglingReference {
            kind: EntityKind::Location,
            id: 99,
        });
        assert_eq!(
            "warning: referenced location id 99 does not exist",
            finding.to_string()
        );

        let finding = Finding::new(Violation::InvalidLabelUnit {
            sample: 2,
            key: Arc::from("allocation size"),
        });
        assert_eq!(
            "fatal: label `allocation size` on sample 2 has a unit but no number",
            finding.to_string()
        );
    }

    #[test]
    fn fatal_and_warnings_partition() {
        let mut report = ValidationReport::default();
        assert!(report.is_empty());
        report.push(Finding::new(Violation::DanglingReference {
            kind: EntityKind::Function,
            id: 1,
        }));
        report.push(Finding::new(Violation::InvalidId {
            kind: EntityKind::Function,
            offset: 0,
        }));
        assert_eq!(2, report.len());
        assert!(report.has_fatal());
        assert_eq!(1, report.fatal().count());
        assert_eq!(1, report.warnings().count());
    }
}
