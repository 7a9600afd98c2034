// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup error types for the engine

use crate::config::ConfigError;
use thiserror::Error;

/// Registration and assembly failures.
///
/// These surface while the engine is being built, before any call is
/// served; none of them is a runtime condition.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two overloads of one method share a parameter-name set
    #[error("{service}.{method}: ambiguous overload, duplicate signature {signature:?}")]
    AmbiguousOverload {
        service: String,
        method: String,
        signature: Vec<String>,
    },
    /// A transaction-disabled method cannot accept entity parameters:
    /// no scope exists at call-resolution time to load them
    #[error("{service}.{method}: parameter \"{param}\" is entity-typed but the method disables the implicit transaction")]
    EntityParamWithoutTransaction {
        service: String,
        method: String,
        param: String,
    },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
