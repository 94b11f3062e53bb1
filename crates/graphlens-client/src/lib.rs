//! Graphlens Client: HTTP access to the graph query backend
//!
//! The backend executes the query language; this crate only transmits the
//! query text and turns the JSON envelope into a [`GraphSnapshot`] or a
//! typed [`ClientError`].

pub mod backend;
pub mod client;
pub mod error;
pub mod wire;

#[cfg(test)]
pub mod tests;

pub use backend::GraphBackend;
pub use client::{ClientConfig, QueryClient};
pub use error::{ClientError, Result};
pub use wire::{QueryResult, Schema};

pub use graphlens_core::GraphSnapshot;
