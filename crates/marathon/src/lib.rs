//! Marathon REST API client.
//!
//! Every operation maps one method call to one HTTP request against a configured
//! Marathon host and returns the decoded JSON body as a [`serde_json::Value`].
//! Application and task documents are passed through untouched.
//!
//! ```no_run
//! # async fn run() -> marathon::Result<()> {
//! use marathon::{Marathon, QueryParams};
//!
//! let marathon = Marathon::new("http://marathon.mesos:8080")?;
//! let apps = marathon
//!     .apps()
//!     .get_list(&QueryParams::new().with("id", "web"))
//!     .await?;
//! println!("{apps}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod apps;
pub mod client;

pub use apps::Apps;
pub use client::{Marathon, MarathonClientBuilder};
pub use marathon_core::client::ClientConfig;
pub use marathon_core::config::MarathonConfig;
pub use marathon_core::{Error, QueryParams};

/// Convenient result alias that reuses the shared Marathon error type.
pub type Result<T> = marathon_core::Result<T>;
