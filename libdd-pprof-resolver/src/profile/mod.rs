// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod function;
mod label;
mod location;
mod mapping;
mod refs;
mod sample;
mod value_type;

pub use function::*;
pub use label::*;
pub use location::*;
pub use mapping::*;
pub use refs::{Ref, Slot};
pub use sample::*;
pub use value_type::*;

pub(crate) use refs::IdSpace;

use crate::resolver::ResolvedRecordSet;
use crate::string_table::StringTable;
use indexmap::IndexMap;
use std::sync::Arc;

/// The root aggregate of a decoded profile. It owns every entity; links
/// between entities are [`Ref`]s into its own sequences, so nothing in here
/// outlives or escapes it. Immutable once assembled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    strings: StringTable,
    sample_types: Vec<ValueType>,
    samples: Vec<Sample>,
    mappings: Vec<Mapping>,
    locations: Vec<Location>,
    functions: Vec<Function>,
    period_type: Option<ValueType>,
    period: i64,
    time_nanos: i64,
    duration_nanos: i64,
    drop_frames: Arc<str>,
    keep_frames: Arc<str>,
    comments: Vec<Arc<str>>,
    default_sample_type: Arc<str>,

    mapping_ids: IdSpace<Mapping>,
    function_ids: IdSpace<Function>,
    location_ids: IdSpace<Location>,
}

impl Profile {
    /// Turns resolved records into the final profile. Labels whose shape
    /// cannot be expressed as a [`LabelValue`] are dropped; the validator
    /// has already reported each of them as fatal.
    pub fn assemble(set: ResolvedRecordSet) -> Self {
        let samples = set
            .samples
            .into_iter()
            .map(|sample| {
                let mut labels: IndexMap<Arc<str>, Vec<LabelValue>> = IndexMap::new();
                for slots in &sample.labels {
                    if let Some(value) = slots.value() {
                        labels.entry(slots.key.clone()).or_default().push(value);
                    }
                }
                Sample {
                    locations: sample.locations,
                    values: sample.values,
                    labels,
                }
            })
            .collect();

        Self {
            strings: set.strings,
            sample_types: set.sample_types,
            samples,
            mappings: set.mappings,
            locations: set.locations,
            functions: set.functions,
            period_type: set.period_type,
            period: set.period,
            time_nanos: set.time_nanos,
            duration_nanos: set.duration_nanos,
            drop_frames: set.drop_frames,
            keep_frames: set.keep_frames,
            comments: set.comments,
            default_sample_type: set.default_sample_type,
            mapping_ids: set.mapping_ids,
            function_ids: set.function_ids,
            location_ids: set.location_ids,
        }
    }

    pub fn string_table(&self) -> &StringTable {
        &self.strings
    }

    pub fn sample_types(&self) -> &[ValueType] {
        &self.sample_types
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn period_type(&self) -> Option<&ValueType> {
        self.period_type.as_ref()
    }

    pub fn period(&self) -> i64 {
        self.period
    }

    pub fn time_nanos(&self) -> i64 {
        self.time_nanos
    }

    pub fn duration_nanos(&self) -> i64 {
        self.duration_nanos
    }

    /// Regex of frames to drop from the top of stacks, empty if unset.
    pub fn drop_frames(&self) -> &str {
        &self.drop_frames
    }

    pub fn keep_frames(&self) -> &str {
        &self.keep_frames
    }

    pub fn comments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.comments.iter().map(|comment| &**comment)
    }

    pub fn default_sample_type(&self) -> &str {
        &self.default_sample_type
    }

    pub fn mapping(&self, mapping: Ref<Mapping>) -> Option<&Mapping> {
        self.mappings.get(mapping.slot()?.offset())
    }

    pub fn function(&self, function: Ref<Function>) -> Option<&Function> {
        self.functions.get(function.slot()?.offset())
    }

    pub fn location(&self, location: Ref<Location>) -> Option<&Location> {
        self.locations.get(location.slot()?.offset())
    }

    pub fn mapping_by_id(&self, id: u64) -> Option<&Mapping> {
        self.mappings.get(self.mapping_ids.get(id)?.offset())
    }

    pub fn function_by_id(&self, id: u64) -> Option<&Function> {
        self.functions.get(self.function_ids.get(id)?.offset())
    }

    pub fn location_by_id(&self, id: u64) -> Option<&Location> {
        self.locations.get(self.location_ids.get(id)?.offset())
    }

    /// The sample's call stack, leaf first. Unresolved frames are `None`.
    pub fn stack<'a>(&'a self, sample: &'a Sample) -> impl Iterator<Item = Option<&'a Location>> {
        sample
            .locations
            .iter()
            .map(move |location| self.location(*location))
    }
}
