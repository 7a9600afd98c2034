// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message localization seam

use crate::status::ResponseStatus;
use std::collections::HashMap;

/// Message rendered for fatal faults absent a catalog entry
pub const GENERIC_FATAL_MESSAGE: &str = "an unexpected error occurred";

/// Maps a status message key to its template
pub trait Localizer: Send + Sync {
    /// Template for a `"{TIER}-{code}"` key, if the catalog has one
    fn template(&self, key: &str) -> Option<String>;
}

/// Substitute positional `{0}`, `{1}`, ... slots with parameters.
///
/// Slots without a matching parameter are left verbatim.
pub fn format_message(template: &str, params: &[String]) -> String {
    let mut out = template.to_string();
    for (i, param) in params.iter().enumerate() {
        out = out.replace(&format!("{{{}}}", i), param);
    }
    out
}

/// Resolve the display message for a status, if it has one.
///
/// Fatal faults fall back to [`GENERIC_FATAL_MESSAGE`] when the catalog
/// has no entry for the literal code key.
pub fn render(localizer: &dyn Localizer, status: &ResponseStatus) -> Option<String> {
    let key = status.message_key()?;
    match localizer.template(&key) {
        Some(template) => Some(format_message(&template, status.params())),
        None => match status {
            ResponseStatus::Fault(fault) if !fault.is_handled() => {
                Some(GENERIC_FATAL_MESSAGE.to_string())
            }
            _ => None,
        },
    }
}

/// In-memory catalog for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    messages: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> StaticCatalog {
        StaticCatalog::default()
    }

    /// Add one message template
    pub fn with_message(
        mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> StaticCatalog {
        self.messages.insert(key.into(), template.into());
        self
    }
}

impl Localizer for StaticCatalog {
    fn template(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

#[cfg(test)]
#[path = "localize_tests.rs"]
mod tests;
