// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::DecodeError;
use crate::profile::*;
use crate::report::{EntityKind, Finding, Violation};
use crate::string_table::StringTable;
use libdd_pprof_protobuf as pprof;
use std::sync::Arc;
use tracing::{debug, trace};

/// A sample whose links and strings are resolved but whose labels still
/// show which wire fields were set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedSample {
    pub locations: Vec<Ref<Location>>,
    pub values: Vec<i64>,
    pub labels: Vec<LabelSlots>,
}

/// Everything in the raw records with string indices replaced by strings and
/// id links replaced by [`Ref`]s. This is what the validator looks at before
/// it becomes a [`Profile`].
#[derive(Clone, Debug)]
pub struct ResolvedRecordSet {
    pub strings: StringTable,
    pub sample_types: Vec<ValueType>,
    pub samples: Vec<ResolvedSample>,
    pub mappings: Vec<Mapping>,
    pub locations: Vec<Location>,
    pub functions: Vec<Function>,
    pub period_type: Option<ValueType>,
    pub period: i64,
    pub time_nanos: i64,
    pub duration_nanos: i64,
    pub drop_frames: Arc<str>,
    pub keep_frames: Arc<str>,
    pub comments: Vec<Arc<str>>,
    pub default_sample_type: Arc<str>,
    /// One `DanglingReference` finding per unresolved link, in the order the
    /// links were met.
    pub dangling: Vec<Finding>,

    pub(crate) mapping_ids: IdSpace<Mapping>,
    pub(crate) function_ids: IdSpace<Function>,
    pub(crate) location_ids: IdSpace<Location>,
}

struct Resolver<'a> {
    strings: &'a StringTable,
    dangling: Vec<Finding>,
}

impl Resolver<'_> {
    #[inline]
    fn string(&self, index: i64, context: &'static str) -> Result<Arc<str>, DecodeError> {
        self.strings
            .resolve(index)
            .cloned()
            .map_err(|err| err.in_context(context))
    }

    /// Index 0 means the field was not set.
    #[inline]
    fn optional_string(
        &self,
        index: i64,
        context: &'static str,
    ) -> Result<Option<Arc<str>>, DecodeError> {
        if index == 0 {
            Ok(None)
        } else {
            self.string(index, context).map(Some)
        }
    }

    fn link<T>(&mut self, ids: &IdSpace<T>, kind: EntityKind, id: u64) -> Ref<T> {
        let link = ids.lookup(id);
        if !link.is_resolved() {
            trace!(%kind, id, "dangling reference");
            self.dangling
                .push(Finding::new(Violation::DanglingReference { kind, id }));
        }
        link
    }

    fn value_type(&self, value_type: &pprof::ValueType) -> Result<ValueType, DecodeError> {
        Ok(ValueType {
            r#type: self.string(value_type.r#type, "value type")?,
            unit: self.string(value_type.unit, "value type unit")?,
        })
    }

    fn mapping(&self, mapping: &pprof::Mapping) -> Result<Mapping, DecodeError> {
        Ok(Mapping {
            id: mapping.id,
            memory_start: mapping.memory_start,
            memory_limit: mapping.memory_limit,
            file_offset: mapping.file_offset,
            filename: self.string(mapping.filename, "mapping filename")?,
            build_id: self.string(mapping.build_id, "mapping build_id")?,
            has_functions: mapping.has_functions,
            has_filenames: mapping.has_filenames,
            has_line_numbers: mapping.has_line_numbers,
            has_inline_frames: mapping.has_inline_frames,
        })
    }

    fn function(&self, function: &pprof::Function) -> Result<Function, DecodeError> {
        Ok(Function {
            id: function.id,
            name: self.string(function.name, "function name")?,
            system_name: self.string(function.system_name, "function system_name")?,
            filename: self.string(function.filename, "function filename")?,
            start_line: function.start_line,
        })
    }

    fn location(
        &mut self,
        location: &pprof::Location,
        mapping_ids: &IdSpace<Mapping>,
        function_ids: &IdSpace<Function>,
    ) -> Location {
        let mapping = match location.mapping_id {
            0 => None,
            id => Some(self.link(mapping_ids, EntityKind::Mapping, id)),
        };
        let lines = location
            .lines
            .iter()
            .map(|line| Line {
                function: self.link(function_ids, EntityKind::Function, line.function_id),
                line: line.line,
            })
            .collect();
        Location {
            id: location.id,
            mapping,
            address: location.address,
            lines,
            is_folded: location.is_folded,
        }
    }

    fn label(&self, label: &pprof::Label) -> Result<LabelSlots, DecodeError> {
        let key = self.string(label.key, "label key")?;
        let str = self.optional_string(label.str, "label value")?;
        let num_unit = self.optional_string(label.num_unit, "label unit")?;
        // proto3 drops a zero `num`; a unit without a string still marks the
        // label as numeric.
        let numeric = label.num != 0 || (num_unit.is_some() && str.is_none());
        Ok(LabelSlots {
            key,
            str,
            num: numeric.then_some(label.num),
            num_unit,
        })
    }

    fn sample(
        &mut self,
        sample: &pprof::Sample,
        location_ids: &IdSpace<Location>,
    ) -> Result<ResolvedSample, DecodeError> {
        let locations = sample
            .location_ids
            .iter()
            .map(|id| self.link(location_ids, EntityKind::Location, *id))
            .collect();
        let labels = sample
            .labels
            .iter()
            .map(|label| self.label(label))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedSample {
            locations,
            values: sample.values.clone(),
            labels,
        })
    }
}

/// Replaces every index in `raw` with what it designates. A string index
/// outside of `strings` means the data is corrupt and aborts; an id with no
/// backing entity only produces an unresolved [`Ref`] and a finding.
pub fn resolve(
    raw: &pprof::Profile,
    strings: StringTable,
) -> Result<ResolvedRecordSet, DecodeError> {
    let mut resolver = Resolver {
        strings: &strings,
        dangling: Vec::new(),
    };

    let sample_types = raw
        .sample_types
        .iter()
        .map(|value_type| resolver.value_type(value_type))
        .collect::<Result<Vec<_>, _>>()?;
    let period_type = raw
        .period_type
        .as_ref()
        .map(|value_type| resolver.value_type(value_type))
        .transpose()?;

    let mappings = raw
        .mappings
        .iter()
        .map(|mapping| resolver.mapping(mapping))
        .collect::<Result<Vec<_>, _>>()?;
    let mapping_ids = IdSpace::build(mappings.iter().map(|mapping| mapping.id));

    let functions = raw
        .functions
        .iter()
        .map(|function| resolver.function(function))
        .collect::<Result<Vec<_>, _>>()?;
    let function_ids = IdSpace::build(functions.iter().map(|function| function.id));

    let locations: Vec<Location> = raw
        .locations
        .iter()
        .map(|location| resolver.location(location, &mapping_ids, &function_ids))
        .collect();
    let location_ids = IdSpace::build(locations.iter().map(|location| location.id));

    let samples = raw
        .samples
        .iter()
        .map(|sample| resolver.sample(sample, &location_ids))
        .collect::<Result<Vec<_>, _>>()?;

    let drop_frames = resolver.string(raw.drop_frames, "drop_frames")?;
    let keep_frames = resolver.string(raw.keep_frames, "keep_frames")?;
    let comments = raw
        .comments
        .iter()
        .map(|comment| resolver.string(*comment, "comment"))
        .collect::<Result<Vec<_>, _>>()?;
    let default_sample_type = resolver.string(raw.default_sample_type, "default_sample_type")?;

    let dangling = resolver.dangling;
    debug!(
        strings = strings.len(),
        samples = samples.len(),
        locations = locations.len(),
        functions = functions.len(),
        mappings = mappings.len(),
        dangling = dangling.len(),
        "resolved profile records"
    );

    Ok(ResolvedRecordSet {
        strings,
        sample_types,
        samples,
        mappings,
        locations,
        functions,
        period_type,
        period: raw.period,
        time_nanos: raw.time_nanos,
        duration_nanos: raw.duration_nanos,
        drop_frames,
        keep_frames,
        comments,
        default_sample_type,
        dangling,
        mapping_ids,
        function_ids,
        location_ids,
    })
}
