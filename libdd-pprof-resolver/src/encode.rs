// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::profile::*;
use crate::string_table::StringTableBuilder;
use libdd_pprof_protobuf as pprof;

impl Profile {
    /// Lowers the profile back into raw records. The profile's own string
    /// table seeds the new one, so every string keeps its index and decoding
    /// the result gives back an equal profile. Unresolved links keep the id
    /// they were looking for.
    pub fn to_raw(&self) -> pprof::Profile {
        let mut strings = StringTableBuilder::from_table(self.string_table());

        let sample_types = self
            .sample_types()
            .iter()
            .map(|value_type| lower_value_type(value_type, &mut strings))
            .collect();
        let period_type = self
            .period_type()
            .map(|value_type| lower_value_type(value_type, &mut strings));

        let mappings = self
            .mappings()
            .iter()
            .map(|mapping| pprof::Mapping {
                id: mapping.id,
                memory_start: mapping.memory_start,
                memory_limit: mapping.memory_limit,
                file_offset: mapping.file_offset,
                filename: strings.intern(&mapping.filename),
                build_id: strings.intern(&mapping.build_id),
                has_functions: mapping.has_functions,
                has_filenames: mapping.has_filenames,
                has_line_numbers: mapping.has_line_numbers,
                has_inline_frames: mapping.has_inline_frames,
            })
            .collect();

        let functions = self
            .functions()
            .iter()
            .map(|function| pprof::Function {
                id: function.id,
                name: strings.intern(&function.name),
                system_name: strings.intern(&function.system_name),
                filename: strings.intern(&function.filename),
                start_line: function.start_line,
            })
            .collect();

        let locations = self
            .locations()
            .iter()
            .map(|location| pprof::Location {
                id: location.id,
                mapping_id: location
                    .mapping
                    .map(|mapping| self.mapping_link_id(mapping))
                    .unwrap_or_default(),
                address: location.address,
                lines: location
                    .lines
                    .iter()
                    .map(|line| pprof::Line {
                        function_id: self.function_link_id(line.function),
                        line: line.line,
                    })
                    .collect(),
                is_folded: location.is_folded,
            })
            .collect();

        let samples = self
            .samples()
            .iter()
            .map(|sample| pprof::Sample {
                location_ids: sample
                    .locations
                    .iter()
                    .map(|location| self.location_link_id(*location))
                    .collect(),
                values: sample.values.clone(),
                labels: sample
                    .labels
                    .iter()
                    .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
                    .map(|(key, value)| lower_label(key, value, &mut strings))
                    .collect(),
            })
            .collect();

        let drop_frames = strings.intern(self.drop_frames());
        let keep_frames = strings.intern(self.keep_frames());
        let comments = self
            .comments()
            .map(|comment| strings.intern(comment))
            .collect();
        let default_sample_type = strings.intern(self.default_sample_type());

        pprof::Profile {
            sample_types,
            samples,
            mappings,
            locations,
            functions,
            string_table: strings.finish(),
            drop_frames,
            keep_frames,
            time_nanos: self.time_nanos(),
            duration_nanos: self.duration_nanos(),
            period_type,
            period: self.period(),
            comments,
            default_sample_type,
        }
    }

    /// Serializes the profile as an uncompressed pprof buffer.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        self.to_raw().to_bytes()
    }

    fn mapping_link_id(&self, mapping: Ref<Mapping>) -> u64 {
        match mapping {
            Ref::Resolved(_) => self.mapping(mapping).map(|m| m.id).unwrap_or_default(),
            Ref::Unresolved { id } => id,
        }
    }

    fn function_link_id(&self, function: Ref<Function>) -> u64 {
        match function {
            Ref::Resolved(_) => self.function(function).map(|f| f.id).unwrap_or_default(),
            Ref::Unresolved { id } => id,
        }
    }

    fn location_link_id(&self, location: Ref<Location>) -> u64 {
        match location {
            Ref::Resolved(_) => self.location(location).map(|l| l.id).unwrap_or_default(),
            Ref::Unresolved { id } => id,
        }
    }
}

fn lower_value_type(value_type: &ValueType, strings: &mut StringTableBuilder) -> pprof::ValueType {
    pprof::ValueType {
        r#type: strings.intern(&value_type.r#type),
        unit: strings.intern(&value_type.unit),
    }
}

fn lower_label(key: &str, value: &LabelValue, strings: &mut StringTableBuilder) -> pprof::Label {
    let key = strings.intern(key);
    match value {
        LabelValue::Str(str) => pprof::Label {
            key,
            str: strings.intern(str),
            num: 0,
            num_unit: 0,
        },
        LabelValue::Num { num, unit } => pprof::Label {
            key,
            str: 0,
            num: *num,
            num_unit: unit.as_deref().map(|unit| strings.intern(unit)).unwrap_or(0),
        },
    }
}
