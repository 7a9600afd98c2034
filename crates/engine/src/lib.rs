// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Teller service execution engine
//!
//! Resolves inbound calls against the registration table, runs them
//! inside the per-call transactional boundary, and turns every outcome
//! into a structured response status.

mod config;
mod context;
mod coordinator;
mod dispatch;
mod error;
mod registry;

pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_CARRIED_OBJECTS};
pub use context::CallContext;
pub use coordinator::{CoordinatorError, TransactionCoordinator};
pub use dispatch::{Call, Dispatcher, DispatcherBuilder, Response};
pub use error::BuildError;
pub use registry::{
    Args, ArgsError, Handler, MethodBinding, ParamSpec, RawArgs, ServiceRegistry, TransactionMode,
};
