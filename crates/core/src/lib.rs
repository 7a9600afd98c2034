// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! teller-core: Core library for the teller service execution engine
//!
//! This crate provides:
//! - The result-code space: severities, blocks, and the process-wide registry
//! - Response status shapes for every call outcome
//! - The fault type business code raises and the classifier chain
//! - The pure per-call transaction state machine
//! - Narrow traits for the persistence engine and message localization

pub mod block;
pub mod builtin;
pub mod classify;
pub mod code;
pub mod fault;
pub mod localize;
pub mod registry;
pub mod scope;
pub mod severity;
pub mod status;
pub mod store;

// Re-exports
pub use block::CodeBlock;
pub use classify::{Classifier, FaultHandler, StoreFaultHandler};
pub use code::{CodeError, ResultCode};
pub use fault::{RawError, ServiceError};
pub use localize::{format_message, Localizer, StaticCatalog};
pub use registry::{CodeRegistry, RegistryBuilder, RegistryError};
pub use scope::{TxError, TxEvent, TxState};
pub use severity::Severity;
pub use status::{Fault, Information, ResponseStatus, StatusError, Warning};
pub use store::{Entity, EntityRef, ScopeId, Session, Store, StoreError};
