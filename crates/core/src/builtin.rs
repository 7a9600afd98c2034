// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in result codes reserved in block 0

use crate::code::ResultCode;
use crate::fault::ServiceError;
use crate::severity::Severity;

/// A persistence-backed object referenced by identity does not exist (HTTP 404)
pub const OBJECT_NOT_FOUND: ResultCode = ResultCode::from_parts(Severity::Error, 20_001);
/// The call targets a service or method with no registered implementation (HTTP 501)
pub const NOT_IMPLEMENTED: ResultCode = ResultCode::from_parts(Severity::Error, 20_002);
/// The call requires an authenticated caller (HTTP 401)
pub const AUTHENTICATION_REQUIRED: ResultCode = ResultCode::from_parts(Severity::Error, 20_003);
/// The caller is not permitted to perform the operation (HTTP 403)
pub const FORBIDDEN: ResultCode = ResultCode::from_parts(Severity::Error, 20_004);
/// Unhandled fault (HTTP 500)
pub const UNHANDLED: ResultCode = ResultCode::UNHANDLED;

/// Fault for an object that could not be re-identified by its key
pub fn object_not_found(kind: &str, key: &str) -> ServiceError {
    ServiceError::new(OBJECT_NOT_FOUND)
        .with_param(kind)
        .with_param(key)
}

/// Fault for a call target with no registered implementation
pub fn not_implemented(target: &str) -> ServiceError {
    ServiceError::new(NOT_IMPLEMENTED).with_param(target)
}

/// Fault for a call that requires an authenticated caller
pub fn authentication_required() -> ServiceError {
    ServiceError::new(AUTHENTICATION_REQUIRED)
}

/// Fault for an operation the caller may not perform
pub fn forbidden(action: &str) -> ServiceError {
    ServiceError::new(FORBIDDEN).with_param(action)
}
