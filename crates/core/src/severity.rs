// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Severity tiers and the fixed global result-code ranges

use serde::{Deserialize, Serialize};

/// Code reserved for success outcomes
pub const SUCCESS_CODE: u32 = 0;
/// Inclusive range reserved for the info tier
pub const INFO_RANGE: (u32, u32) = (1, 10_000);
/// Inclusive range reserved for the warning tier
pub const WARNING_RANGE: (u32, u32) = (10_001, 20_000);
/// Inclusive range reserved for the error tier
pub const ERROR_RANGE: (u32, u32) = (20_001, 90_000);
/// Code reserved for unhandled faults
pub const FATAL_CODE: u32 = 99_999;

/// Severity tier of a result code.
///
/// The tier is fully determined by the code's numeric range; see
/// [`Severity::of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Normal return, code 0
    Success,
    /// Non-fatal signal attached to a successful response
    Info,
    /// Non-fatal signal attached to a successful response
    Warning,
    /// Expected business-rule violation (handled fault)
    Error,
    /// Unexpected defect (unhandled fault), always code 99999
    Fatal,
}

impl Severity {
    /// Derive the severity implied by a code value.
    ///
    /// Returns `None` for values outside every reserved range
    /// (`90001..=99998` and anything above `99999`).
    pub fn of(value: u32) -> Option<Severity> {
        match value {
            SUCCESS_CODE => Some(Severity::Success),
            v if v >= INFO_RANGE.0 && v <= INFO_RANGE.1 => Some(Severity::Info),
            v if v >= WARNING_RANGE.0 && v <= WARNING_RANGE.1 => Some(Severity::Warning),
            v if v >= ERROR_RANGE.0 && v <= ERROR_RANGE.1 => Some(Severity::Error),
            FATAL_CODE => Some(Severity::Fatal),
            _ => None,
        }
    }

    /// Three-letter tier abbreviation used in message keys.
    ///
    /// Success and Fatal have none: success outcomes carry no message,
    /// and fatal faults use the literal code as their key.
    pub fn abbr(&self) -> Option<&'static str> {
        match self {
            Severity::Info => Some("INF"),
            Severity::Warning => Some("WAR"),
            Severity::Error => Some("ERR"),
            Severity::Success | Severity::Fatal => None,
        }
    }

    /// Whether this tier represents a fault outcome
    pub fn is_fault(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "severity_tests.rs"]
mod tests;
