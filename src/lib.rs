//! Renders extension API schema documents (namespaces of functions, types,
//! properties and events) into cross-linked documentation pages, and uploads
//! the result to a documentation wiki.
//!
//! Pipeline: [`loader`] → [`ir`] → [`emit`] (using [`render`]) → [`output`]
//! → [`publish`]. [`generate`] ties the first four together for one run.
pub mod audit;
pub mod config;
pub mod emit;
pub mod error;
pub mod generate;
pub mod ir;
pub mod loader;
pub mod logging;
pub mod lower;
pub mod output;
pub mod path_de;
pub mod preprocess;
pub mod publish;
pub mod raw;
pub mod render;

pub use error::{DocumentFailure, EntityFailure, Error, Result};
