//! HTTP front end for the alttext proxy.
//!
//! Loads layered configuration, initializes logging, and serves the axum
//! router that hands requests to an [`alttext_dispatch::Dispatcher`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;
mod router;

pub use config::{
    AppConfig, LoggingConfig, LoggingConfigBuilder, ServerConfig, ServerConfigBuilder,
};
pub use observability::{filter_directive, init_logging};
pub use router::{AppState, OutcomeResponse, create_router};
