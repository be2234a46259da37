//! qcat Hardware Abstraction Layer
//!
//! This crate defines what a backend family has to provide and how a
//! translated circuit gets executed, independent of any particular backend.
//!
//! # Overview
//!
//! - A single [`Backend`] capability per family: translation, routing,
//!   remote connection and payload building
//! - [`NativeCircuit`] for translated circuits, which draw themselves and
//!   lower to a [`LoweredCircuit`] for local simulation
//! - [`ExecutionRequest`] describing target, repetitions, credentials,
//!   storage and polling
//! - The [`Dispatcher`], which normalizes local simulation and remote
//!   submit/poll/resolve into one [`ExecutionResult`]
//!
//! # Error taxonomy
//!
//! | Error | Raised |
//! |-------|--------|
//! | [`HalError::UnsupportedTranslation`] | during translation |
//! | [`HalError::MissingCredentials`] | in `connect()`, before any network call |
//! | [`HalError::TaskFailed`] | after a terminal `Failed` status |
//! | [`HalError::TaskTimeout`] | when polling exceeds the timeout |
//!
//! Qubit index violations never reach this crate: they are
//! [`qcat_ir::IrError::QubitOutOfBounds`] at append time.

pub mod backend;
pub mod custom;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod kind;
pub mod lowered;
pub mod registry;
pub mod remote;
pub mod request;
pub mod result;

pub use backend::{Backend, NativeCircuit, Route, Simulator, downcast_native};
pub use custom::CustomGate;
pub use dispatch::{Dispatcher, wait_for_task};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use kind::BackendKind;
pub use lowered::{LoweredCircuit, LoweredOp};
pub use registry::BackendRegistry;
pub use remote::{Program, TaskApi, TaskPayload};
pub use request::{
    Credentials, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_REPETITIONS,
    DEFAULT_SIMULATOR, ExecutionRequest, StorageLocation, Target,
};
pub use result::{Counts, ExecutionResult};
