// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fault type business code raises

use crate::code::ResultCode;
use crate::status::Fault;
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// A raw fault as it propagates through the dispatch pipeline
pub type RawError = Box<dyn Error + Send + Sync + 'static>;

/// A business fault bound to a specific result code.
///
/// Business modules pre-declare their recoverable conditions as named
/// constructors returning this type. The dispatcher intercepts it at the
/// call boundary, rolls back the open transaction scope, and translates
/// it into a fault response.
#[derive(Debug)]
pub struct ServiceError {
    fault: Fault,
    source: Option<RawError>,
}

impl ServiceError {
    /// Create a fault carrying an error- or fatal-tier code.
    ///
    /// Raising a non-fault code is a defect in the raising module and
    /// degrades to the unhandled fatal code.
    pub fn new(code: ResultCode) -> ServiceError {
        let fault = match Fault::new(code) {
            Ok(fault) => fault,
            Err(err) => {
                tracing::error!(code = code.value(), error = %err, "non-fault code raised as fault");
                Fault::unhandled()
            }
        };
        ServiceError {
            fault,
            source: None,
        }
    }

    /// Append a positional message parameter
    pub fn with_param(self, param: impl ToString) -> ServiceError {
        ServiceError {
            fault: self.fault.with_param(param),
            source: self.source,
        }
    }

    /// Attach an opaque machine-readable payload
    pub fn with_extra(self, extra: Value) -> ServiceError {
        ServiceError {
            fault: self.fault.with_extra(extra),
            source: self.source,
        }
    }

    /// Preserve the underlying cause for logging
    pub fn with_source(mut self, source: impl Into<RawError>) -> ServiceError {
        self.source = Some(source.into());
        self
    }

    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    /// Consume into the fault status shape
    pub fn into_fault(self) -> Fault {
        self.fault
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault {}", self.fault.code())?;
        if !self.fault.params().is_empty() {
            write!(f, " [{}]", self.fault.params().join(", "))?;
        }
        Ok(())
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn Error + 'static))
    }
}

impl From<Fault> for ServiceError {
    fn from(fault: Fault) -> ServiceError {
        ServiceError {
            fault,
            source: None,
        }
    }
}

#[cfg(test)]
#[path = "fault_tests.rs"]
mod tests;
