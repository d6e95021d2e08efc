// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Turns an encoded [`pprof`] profile into an owned, fully resolved object
//! graph:
//!
//! 1. the bytes are framed into raw records by [`libdd_pprof_protobuf`],
//! 2. the string table is interned into a [`StringTable`],
//! 3. [`resolve`] replaces every string index with its string and every id
//!    link with a [`Ref`] into the profile's own entity sequences,
//! 4. [`validate`] checks the cross-entity rules and produces a
//!    [`ValidationReport`],
//! 5. [`Profile::assemble`] builds the root aggregate.
//!
//! A string index with no backing string is corrupt data and aborts the
//! decode. An id that points nowhere is common in partially symbolized
//! profiles, so it only becomes an unresolved [`Ref`] plus a warning. Every
//! other rule produces a [`Finding`], and [`DecodeOptions`] decides whether
//! fatal findings reject the profile.
//!
//! Nothing is shared between two decodes, so independent buffers can be
//! decoded on as many threads as the caller likes.
//!
//! [`pprof`]: https://github.com/google/pprof/blob/main/proto/profile.proto

mod collections;
mod encode;
mod error;
mod options;
mod profile;
mod report;
mod resolver;
mod string_table;
mod validator;

pub use error::*;
pub use options::*;
pub use profile::*;
pub use report::*;
pub use resolver::*;
pub use string_table::*;
pub use validator::*;

pub use libdd_pprof_protobuf as pprof;

use tracing::debug;

/// The raw records of one profile, as framed on the wire.
pub type RawRecordSet = pprof::Profile;

/// A successfully decoded profile and everything found wrong with it that
/// the [`DecodeOptions`] allowed through.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decoded {
    pub profile: Profile,
    pub report: ValidationReport,
}

/// Runs the whole pipeline over an uncompressed pprof buffer.
pub fn decode(buffer: &[u8], options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let raw = pprof::decode(buffer)?;
    decode_raw(&raw, options)
}

/// Runs the pipeline over records the caller already framed.
pub fn decode_raw(raw: &RawRecordSet, options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let strings = StringTable::intern(&raw.string_table)?;
    let set = resolve(raw, strings)?;
    let report = validate(&set, &options.validation);

    if options.reject_fatal {
        if let Some(first) = report.fatal().next() {
            let fatal_count = report.fatal().count();
            debug!(fatal_count, %first, "rejecting profile");
            return Err(DecodeError::Rejected {
                first: first.clone(),
                fatal_count,
            });
        }
    }

    Ok(Decoded {
        profile: Profile::assemble(set),
        report,
    })
}
