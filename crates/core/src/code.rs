// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result codes: globally unique integers with severity implied by range

use crate::severity::Severity;
use serde::Serialize;
use thiserror::Error;

/// Errors constructing result codes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("code {value} does not fall in the {severity} range")]
    SeverityMismatch { severity: Severity, value: u32 },
    #[error("code {value} falls outside every reserved severity range")]
    UnmappedValue { value: u32 },
    #[error("offset {offset} exceeds the {tier} capacity of block {block} ({capacity} codes)")]
    OffsetOutOfRange {
        block: u16,
        tier: Severity,
        offset: u32,
        capacity: u32,
    },
}

/// A globally unique result code.
///
/// The value alone determines the severity; both constructors enforce
/// the fixed ranges, and the type is immutable once built. No
/// `Deserialize` impl exists: codes re-enter the process through the
/// checked constructors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResultCode {
    severity: Severity,
    value: u32,
}

impl ResultCode {
    /// The reserved success code (0)
    pub const SUCCESS: ResultCode = ResultCode::from_parts(Severity::Success, 0);
    /// The reserved unhandled-fault code (99999)
    pub const UNHANDLED: ResultCode = ResultCode::from_parts(Severity::Fatal, 99_999);

    pub(crate) const fn from_parts(severity: Severity, value: u32) -> ResultCode {
        ResultCode { severity, value }
    }

    /// Construct a code, verifying the value falls in the severity's range
    pub fn new(severity: Severity, value: u32) -> Result<ResultCode, CodeError> {
        match Severity::of(value) {
            Some(actual) if actual == severity => Ok(ResultCode { severity, value }),
            Some(_) => Err(CodeError::SeverityMismatch { severity, value }),
            None => Err(CodeError::UnmappedValue { value }),
        }
    }

    /// Construct a code from a bare value, deriving the severity
    pub fn from_value(value: u32) -> Result<ResultCode, CodeError> {
        let severity = Severity::of(value).ok_or(CodeError::UnmappedValue { value })?;
        Ok(ResultCode { severity, value })
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Localized-message lookup key.
    ///
    /// `INF-`/`WAR-`/`ERR-` prefixed for the message tiers, the literal
    /// value for fatal codes, none for success.
    pub fn message_key(&self) -> Option<String> {
        match self.severity.abbr() {
            Some(abbr) => Some(format!("{}-{}", abbr, self.value)),
            None if self.severity == Severity::Fatal => Some(self.value.to_string()),
            None => None,
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
