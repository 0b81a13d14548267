//! `courier-http` is an async HTTP client orchestration layer.
//!
//! API calls are described declaratively with [`RequestDescriptor`] and
//! dispatched through [`CourierClient::execute`], which handles URL
//! assembly, query encoding, bearer-token injection, and retry with a
//! constant delay. Socket I/O and TLS are delegated to `reqwest`.
//!
//! Non-2xx HTTP statuses are **not** errors at this layer: a completed
//! exchange is surfaced as a [`Response`] regardless of status code, and
//! interpreting the status is the caller's job.

mod build;
mod client;
mod descriptor;
mod error;
mod retry;
mod session;
mod types;

pub use client::{CancelToken, CourierClient};
pub use descriptor::RequestDescriptor;
pub use error::CourierError;
pub use retry::RetryPolicy;
pub use session::Session;
pub use types::{Method, Response};

pub type Result<T> = std::result::Result<T, CourierError>;
