//! IonQ: Cirq circuits submitted to IonQ's hosted simulator or QPUs.

mod api;
mod backend;
mod circuit;
mod error;

pub use api::{DEFAULT_ENDPOINT, IonqClient, JobFailure, JobResponse, decode_histogram};
pub use backend::{IONQ_SIMULATOR, IonqBackend};
pub use circuit::{IONQ_FORMAT, IonqCircuit, translate};
pub use error::{IonqError, IonqResult};

/// Credential name reported when no API key is supplied.
pub const API_KEY_CREDENTIAL: &str = "an IonQ API key";
