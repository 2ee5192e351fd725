//! # marathon-core
//!
//! Core types and utilities shared by the Marathon REST client.
//!
//! ## Modules
//!
//! - [`error`] - Error type carrying transport failures and non-2xx responses
//! - [`query`] - Query-string builder with repeated-key support
//! - [`config`] - Serializable endpoint, TLS and credential configuration
//! - [`client`] - HTTP transport settings

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use error::{Error, Result};
pub use query::QueryParams;
