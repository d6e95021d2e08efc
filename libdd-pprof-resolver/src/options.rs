// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::report::Severity;
use serde::Deserialize;

/// Caller policy for a whole decode. Missing keys keep their defaults when
/// deserialized, so a partial JSON document is fine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Fail the decode with [`crate::DecodeError::Rejected`] when the report
    /// holds any fatal finding.
    pub reject_fatal: bool,
    pub validation: ValidationOptions,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            reject_fatal: true,
            validation: ValidationOptions::default(),
        }
    }
}

impl DecodeOptions {
    /// Keeps every profile that resolves, whatever the report says.
    pub fn permissive() -> Self {
        Self {
            reject_fatal: false,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    /// Instrumented tools often emit addresses a little outside of their
    /// mapping, so this is only a warning unless a deployment says otherwise.
    pub address_out_of_range: Severity,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            address_out_of_range: Severity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json() {
        let options: DecodeOptions =
            serde_json::from_str(r#"{"validation": {"address_out_of_range": "fatal"}}"#).unwrap();
        assert!(options.reject_fatal);
        assert_eq!(Severity::Fatal, options.validation.address_out_of_range);

        let options: DecodeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(DecodeOptions::default(), options);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<DecodeOptions>(r#"{"reject": false}"#);
        assert!(result.is_err());
    }
}
