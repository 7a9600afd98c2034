// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response statuses: the structured outcome of a dispatched call

use crate::builtin;
use crate::code::ResultCode;
use crate::severity::Severity;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors constructing response statuses
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("code {value} is {actual}-tier, expected {expected}")]
    WrongSeverity {
        value: u32,
        actual: Severity,
        expected: &'static str,
    },
}

/// An informational signal attached to an otherwise successful response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Information {
    code: ResultCode,
    params: Vec<String>,
}

impl Information {
    /// Create an information status; the code must be info-tier
    pub fn new(code: ResultCode) -> Result<Information, StatusError> {
        if code.severity() != Severity::Info {
            return Err(StatusError::WrongSeverity {
                value: code.value(),
                actual: code.severity(),
                expected: "info",
            });
        }
        Ok(Information {
            code,
            params: Vec::new(),
        })
    }

    /// Append a positional message parameter
    pub fn with_param(mut self, param: impl ToString) -> Information {
        self.params.push(param.to_string());
        self
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// A warning signal attached to an otherwise successful response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    code: ResultCode,
    params: Vec<String>,
}

impl Warning {
    /// Create a warning status; the code must be warning-tier
    pub fn new(code: ResultCode) -> Result<Warning, StatusError> {
        if code.severity() != Severity::Warning {
            return Err(StatusError::WrongSeverity {
                value: code.value(),
                actual: code.severity(),
                expected: "warning",
            });
        }
        Ok(Warning {
            code,
            params: Vec::new(),
        })
    }

    /// Append a positional message parameter
    pub fn with_param(mut self, param: impl ToString) -> Warning {
        self.params.push(param.to_string());
        self
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// A fault outcome: a handled business error or an unhandled defect.
///
/// The optional extra payload is opaque machine-readable data for the
/// caller; it is never populated unless explicitly supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fault {
    code: ResultCode,
    params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<Value>,
}

impl Fault {
    /// Create a fault; the code must be error- or fatal-tier
    pub fn new(code: ResultCode) -> Result<Fault, StatusError> {
        if !code.severity().is_fault() {
            return Err(StatusError::WrongSeverity {
                value: code.value(),
                actual: code.severity(),
                expected: "error or fatal",
            });
        }
        Ok(Fault {
            code,
            params: Vec::new(),
            extra: None,
        })
    }

    /// The reserved unhandled fault: fatal 99999, no parameters
    pub fn unhandled() -> Fault {
        Fault {
            code: ResultCode::UNHANDLED,
            params: Vec::new(),
            extra: None,
        }
    }

    /// Append a positional message parameter
    pub fn with_param(mut self, param: impl ToString) -> Fault {
        self.params.push(param.to_string());
        self
    }

    /// Attach an opaque machine-readable payload
    pub fn with_extra(mut self, extra: Value) -> Fault {
        self.extra = Some(extra);
        self
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    /// Handled faults are part of the business contract; unhandled ones
    /// indicate a defect
    pub fn is_handled(&self) -> bool {
        self.code.severity() == Severity::Error
    }

    /// HTTP status a transport collaborator should render this fault as
    pub fn http_status(&self) -> u16 {
        if !self.is_handled() {
            return 500;
        }
        match self.code.value() {
            v if v == builtin::AUTHENTICATION_REQUIRED.value() => 401,
            v if v == builtin::FORBIDDEN.value() => 403,
            v if v == builtin::OBJECT_NOT_FOUND.value() => 404,
            v if v == builtin::NOT_IMPLEMENTED.value() => 501,
            _ => 400,
        }
    }
}

/// The structured outcome of one dispatched call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Normal return; carries the method's return value
    Success { body: Value },
    Information(Information),
    Warning(Warning),
    Fault(Fault),
}

impl ResponseStatus {
    pub fn code(&self) -> ResultCode {
        match self {
            ResponseStatus::Success { .. } => ResultCode::SUCCESS,
            ResponseStatus::Information(info) => info.code(),
            ResponseStatus::Warning(warning) => warning.code(),
            ResponseStatus::Fault(fault) => fault.code(),
        }
    }

    /// Localized-message lookup key, when the status has one
    pub fn message_key(&self) -> Option<String> {
        self.code().message_key()
    }

    /// Ordered message-format parameters
    pub fn params(&self) -> &[String] {
        match self {
            ResponseStatus::Success { .. } => &[],
            ResponseStatus::Information(info) => info.params(),
            ResponseStatus::Warning(warning) => warning.params(),
            ResponseStatus::Fault(fault) => fault.params(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success { .. })
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, ResponseStatus::Fault(_))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
