//! Core entry point for the sales_dashboard crate.
//!
//! Loads a sales CSV into a [`data::SalesTable`] and renders the fixed set of
//! PNG and HTML charts described by [`Artifact`].

pub mod artifact;
pub mod builder;
pub mod config;
pub mod data;
pub mod error;
pub mod fonts;
pub mod model;
pub mod static_charts;
pub mod stats;

#[cfg(feature = "interactive")]
pub mod interactive;

pub use artifact::Artifact;
pub use builder::{ReportBuilder, ReportOutput, COMPLETION_MESSAGE};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
