// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! This crate holds the raw records of a [`profiles`] message: every entity
//! exactly as it was framed on the wire, still carrying string-table indices
//! and id links. Nothing here checks that those indices or ids point
//! anywhere; that is left to the resolver that consumes these records.
//!
//! The records are:
//!
//! - [Profile], the root message owning everything else
//! - [Function]
//! - [Label]
//! - [Location] and [Line]
//! - [Mapping]
//! - [Sample]
//! - [ValueType]
//!
//! [`profiles`]: https://github.com/google/pprof/blob/main/proto/profile.proto

mod records;

pub use records::*;

use prost::Message;

/// Frames an uncompressed pprof buffer into its raw records. Only the
/// protobuf framing is checked; a buffer that decodes here can still hold
/// dangling indices and ids.
pub fn decode(buffer: &[u8]) -> Result<Profile, prost::DecodeError> {
    Profile::decode(buffer)
}

impl Profile {
    /// Serializes the records back into the in-wire protobuf format.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_empty_profile() {
        let profile = decode(&[]).unwrap();
        assert_eq!(Profile::default(), profile);
        assert!(profile.string_table.is_empty());
    }

    #[test]
    fn unpacked_scalars() {
        // Profile.sample { location_id: 7, value: 42 } with both repeated
        // scalars written unpacked, as some older producers do.
        let bytes = [0x12, 0x04, 0x08, 0x07, 0x10, 0x2a];
        let profile = decode(&bytes).unwrap();
        assert_eq!(1, profile.samples.len());
        assert_eq!(vec![7], profile.samples[0].location_ids);
        assert_eq!(vec![42], profile.samples[0].values);
    }

    #[test]
    fn function_start_line() {
        let profile = Profile {
            functions: vec![Function {
                id: 5,
                name: 3,
                system_name: 3,
                filename: 4,
                start_line: 120,
            }],
            string_table: vec![
                String::new(),
                "cpu".to_string(),
                "nanoseconds".to_string(),
                "main".to_string(),
                "main.c".to_string(),
            ],
            ..Profile::default()
        };
        let roundtrip = decode(&profile.to_bytes()).unwrap();
        assert_eq!(profile, roundtrip);
        assert_eq!(120, roundtrip.functions[0].start_line);
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        // A length-delimited sample that claims 4 bytes but only has 2.
        let bytes = [0x12, 0x04, 0x08, 0x07];
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn fuzz_decode() {
        bolero::check!().for_each(|bytes: &[u8]| {
            let _ = decode(bytes);
        });
    }
}
