//! This crate contains the logging setup shared by the cluster configuration tools.
//!
//! Unlike most applications, the tools never install a global default subscriber. Instead,
//! [`Logging::dispatch`] returns a [`tracing::Dispatch`] which the caller injects into the scope
//! that should emit events, e.g. by using [`tracing::instrument::WithSubscriber`] for futures or
//! [`tracing::dispatcher::with_default`] for synchronous code.
//!
//! ```
//! use config_tools_telemetry::{Logging, LoggingOptions};
//!
//! let dispatch = Logging::pre_configured("foobar", LoggingOptions::default())
//!     .dispatch()
//!     .expect("logging can be set up without a file log directory");
//!
//! tracing::dispatcher::with_default(&dispatch, || {
//!     tracing::info!("log a message");
//! });
//! ```
mod logging;
mod options;

pub use logging::*;
pub use options::*;
