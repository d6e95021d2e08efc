// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::FxHashSet;
use crate::options::ValidationOptions;
use crate::report::{EntityKind, Finding, Severity, ValidationReport, Violation};
use crate::resolver::ResolvedRecordSet;
use tracing::debug;

/// Checks the structural rules of a resolved profile. The report starts with
/// the resolver's dangling references and then lists the findings of each
/// pass in a fixed order, so the same input always yields the same report.
pub fn validate(set: &ResolvedRecordSet, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.extend(set.dangling.iter().cloned());

    duplicate_ids(&mut report, EntityKind::Mapping, set.mappings.iter().map(|m| m.id));
    duplicate_ids(&mut report, EntityKind::Function, set.functions.iter().map(|f| f.id));
    duplicate_ids(&mut report, EntityKind::Location, set.locations.iter().map(|l| l.id));

    zero_ids(&mut report, EntityKind::Mapping, set.mappings.iter().map(|m| m.id));
    zero_ids(&mut report, EntityKind::Function, set.functions.iter().map(|f| f.id));
    zero_ids(&mut report, EntityKind::Location, set.locations.iter().map(|l| l.id));

    value_arity(&mut report, set);
    mapping_ranges(&mut report, set);
    start_lines(&mut report, set);
    addresses(&mut report, set, options.address_out_of_range);
    label_variants(&mut report, set);
    label_units(&mut report, set);

    debug!(
        findings = report.len(),
        fatal = report.fatal().count(),
        "validated profile records"
    );
    report
}

/// Reports each repeated nonzero id once, at its first repetition.
fn duplicate_ids(report: &mut ValidationReport, kind: EntityKind, ids: impl Iterator<Item = u64>) {
    let mut seen = FxHashSet::default();
    let mut reported = FxHashSet::default();
    for id in ids.filter(|id| *id != 0) {
        if !seen.insert(id) && reported.insert(id) {
            report.push(Finding::new(Violation::DuplicateId { kind, id }));
        }
    }
}

fn zero_ids(report: &mut ValidationReport, kind: EntityKind, ids: impl Iterator<Item = u64>) {
    for (offset, _) in ids.enumerate().filter(|(_, id)| *id == 0) {
        report.push(Finding::new(Violation::InvalidId { kind, offset }));
    }
}

fn value_arity(report: &mut ValidationReport, set: &ResolvedRecordSet) {
    let expected = set.sample_types.len();
    for (sample, resolved) in set.samples.iter().enumerate() {
        let actual = resolved.values.len();
        if actual != expected {
            report.push(Finding::new(Violation::ValueArityMismatch {
                sample,
                expected,
                actual,
            }));
        }
    }
}

fn mapping_ranges(report: &mut ValidationReport, set: &ResolvedRecordSet) {
    for mapping in set.mappings.iter().filter(|m| !m.has_valid_range()) {
        report.push(Finding::new(Violation::InvalidMappingRange {
            id: mapping.id,
            memory_start: mapping.memory_start,
            memory_limit: mapping.memory_limit,
        }));
    }
}

/// Zero means the start line is unknown, so only negative lines are reported.
fn start_lines(report: &mut ValidationReport, set: &ResolvedRecordSet) {
    for function in set.functions.iter().filter(|f| f.start_line < 0) {
        report.push(Finding::new(Violation::InvalidStartLine {
            id: function.id,
            start_line: function.start_line,
        }));
    }
}

/// An address of zero means "unknown" and is never checked, and neither are
/// mappings whose range is already reported as invalid.
fn addresses(report: &mut ValidationReport, set: &ResolvedRecordSet, severity: Severity) {
    for location in set.locations.iter().filter(|l| l.address != 0) {
        let Some(slot) = location.mapping.and_then(|mapping| mapping.slot()) else {
            continue;
        };
        let Some(mapping) = set.mappings.get(slot.offset()) else {
            continue;
        };
        if mapping.has_valid_range() && !mapping.contains(location.address) {
            let violation = Violation::AddressOutOfMappingRange {
                location_id: location.id,
                address: location.address,
                mapping_id: mapping.id,
                memory_start: mapping.memory_start,
                memory_limit: mapping.memory_limit,
            };
            report.push(Finding::with_severity(violation, severity));
        }
    }
}

fn label_variants(report: &mut ValidationReport, set: &ResolvedRecordSet) {
    for (sample, resolved) in set.samples.iter().enumerate() {
        for label in resolved.labels.iter().filter(|l| !l.has_valid_variant()) {
            report.push(Finding::new(Violation::InvalidLabelVariant {
                sample,
                key: label.key.clone(),
            }));
        }
    }
}

fn label_units(report: &mut ValidationReport, set: &ResolvedRecordSet) {
    for (sample, resolved) in set.samples.iter().enumerate() {
        for label in resolved.labels.iter().filter(|l| !l.has_valid_unit()) {
            report.push(Finding::new(Violation::InvalidLabelUnit {
                sample,
                key: label.key.clone(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::string_table::StringTable;
    use libdd_pprof_protobuf as pprof;

    fn strings() -> StringTable {
        StringTable::intern(["", "cpu", "nanoseconds", "main", "libc.so", "bytes", "thread"])
            .unwrap()
    }

    fn mapping(id: u64, memory_start: u64, memory_limit: u64) -> pprof::Mapping {
        pprof::Mapping {
            id,
            memory_start,
            memory_limit,
            filename: 4,
            ..Default::default()
        }
    }

    fn location(id: u64, mapping_id: u64, address: u64) -> pprof::Location {
        pprof::Location {
            id,
            mapping_id,
            address,
            lines: vec![pprof::Line {
                function_id: 5,
                line: 10,
            }],
            is_folded: false,
        }
    }

    fn raw() -> pprof::Profile {
        pprof::Profile {
            sample_types: vec![pprof::ValueType { r#type: 1, unit: 2 }],
            samples: vec![pprof::Sample {
                location_ids: vec![7],
                values: vec![42],
                labels: vec![],
            }],
            mappings: vec![mapping(1, 0x1000, 0x2000)],
            locations: vec![location(7, 1, 0x1800)],
            functions: vec![pprof::Function {
                id: 5,
                name: 3,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn report(raw: &pprof::Profile) -> ValidationReport {
        let set = resolve(raw, strings()).unwrap();
        validate(&set, &ValidationOptions::default())
    }

    fn violations(report: &ValidationReport) -> Vec<Violation> {
        report.iter().map(|f| f.violation.clone()).collect()
    }

    #[test]
    fn clean() {
        assert!(report(&raw()).is_empty());
    }

    #[test]
    fn duplicate_mapping_ids() {
        let mut raw = raw();
        raw.mappings.push(mapping(3, 0, 0x10));
        raw.mappings.push(mapping(3, 0, 0x10));
        raw.mappings.push(mapping(3, 0, 0x10));
        let report = report(&raw);
        assert_eq!(
            vec![Violation::DuplicateId {
                kind: EntityKind::Mapping,
                id: 3
            }],
            violations(&report)
        );
        assert!(report.has_fatal());
    }

    #[test]
    fn zero_ids_are_invalid_not_duplicate() {
        let mut raw = raw();
        raw.functions.push(pprof::Function::default());
        raw.functions.push(pprof::Function::default());
        let report = report(&raw);
        assert_eq!(
            vec![
                Violation::InvalidId {
                    kind: EntityKind::Function,
                    offset: 1
                },
                Violation::InvalidId {
                    kind: EntityKind::Function,
                    offset: 2
                },
            ],
            violations(&report)
        );
    }

    #[test]
    fn value_arity() {
        let mut raw = raw();
        raw.samples[0].values.push(1);
        let report = report(&raw);
        assert_eq!(
            vec![Violation::ValueArityMismatch {
                sample: 0,
                expected: 1,
                actual: 2
            }],
            violations(&report)
        );
    }

    #[test]
    fn inverted_mapping_range_skips_address_check() {
        let mut raw = raw();
        raw.mappings[0] = mapping(1, 0x2000, 0x1000);
        let report = report(&raw);
        assert_eq!(
            vec![Violation::InvalidMappingRange {
                id: 1,
                memory_start: 0x2000,
                memory_limit: 0x1000
            }],
            violations(&report)
        );
    }

    #[test]
    fn negative_start_line() {
        let mut raw = raw();
        raw.functions[0].start_line = -5;
        let report = report(&raw);
        assert_eq!(
            vec![Violation::InvalidStartLine {
                id: 5,
                start_line: -5
            }],
            violations(&report)
        );
        assert!(report.has_fatal());
    }

    #[test]
    fn zero_start_line_is_unknown() {
        let mut raw = raw();
        raw.functions[0].start_line = 0;
        assert!(report(&raw).is_empty());
    }

    #[test]
    fn address_out_of_range_is_a_warning() {
        let mut raw = raw();
        raw.locations[0].address = 0x2000;
        let report = report(&raw);
        assert_eq!(1, report.len());
        assert!(!report.has_fatal());
        assert!(matches!(
            report.findings()[0].violation,
            Violation::AddressOutOfMappingRange {
                location_id: 7,
                address: 0x2000,
                mapping_id: 1,
                ..
            }
        ));
    }

    #[test]
    fn address_out_of_range_can_be_escalated() {
        let mut raw = raw();
        raw.locations[0].address = 0x10;
        let set = resolve(&raw, strings()).unwrap();
        let options = ValidationOptions {
            address_out_of_range: Severity::Fatal,
        };
        let report = validate(&set, &options);
        assert_eq!(1, report.fatal().count());
    }

    #[test]
    fn zero_address_is_not_checked() {
        let mut raw = raw();
        raw.locations[0].address = 0;
        assert!(report(&raw).is_empty());
    }

    #[test]
    fn labels() {
        let mut raw = raw();
        raw.samples[0].labels = vec![
            // ok: string
            pprof::Label {
                key: 6,
                str: 3,
                ..Default::default()
            },
            // both
            pprof::Label {
                key: 6,
                str: 3,
                num: 1,
                num_unit: 0,
            },
            // neither
            pprof::Label {
                key: 6,
                ..Default::default()
            },
            // string with a unit
            pprof::Label {
                key: 6,
                str: 3,
                num_unit: 5,
                ..Default::default()
            },
            // ok: zero with a unit
            pprof::Label {
                key: 6,
                num_unit: 5,
                ..Default::default()
            },
            // ok: number with unit
            pprof::Label {
                key: 6,
                num: 512,
                num_unit: 5,
                ..Default::default()
            },
        ];
        let report = report(&raw);
        let key: std::sync::Arc<str> = "thread".into();
        assert_eq!(
            vec![
                Violation::InvalidLabelVariant {
                    sample: 0,
                    key: key.clone()
                },
                Violation::InvalidLabelVariant {
                    sample: 0,
                    key: key.clone()
                },
                Violation::InvalidLabelUnit { sample: 0, key },
            ],
            violations(&report)
        );
        assert_eq!(3, report.fatal().count());
    }

    #[test]
    fn dangling_references_come_first() {
        let mut raw = raw();
        raw.samples[0].location_ids.push(99);
        raw.samples[0].values.clear();
        let report = report(&raw);
        assert_eq!(
            vec![
                Violation::DanglingReference {
                    kind: EntityKind::Location,
                    id: 99
                },
                Violation::ValueArityMismatch {
                    sample: 0,
                    expected: 1,
                    actual: 0
                },
            ],
            violations(&report)
        );
    }
}
