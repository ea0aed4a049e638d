//! Core building blocks: geometry, configuration, errors, logging

mod config;
mod error;
mod geometry;
pub mod logging;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
