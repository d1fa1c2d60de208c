//! Schema → markup fragments.
//!
//! - [`describe`]: one-line type descriptions (`array of <code>string</code>`)
//! - [`table`]: property / parameter tables and enum listings
//! - [`anon`]: discovery of inline objects that need their own section
//! - [`markup`]: small shared helpers (cross-references, code spans)
//!
//! All of it is pure: same schema in, same text out.
pub mod anon;
pub mod describe;
pub mod markup;
pub mod table;

pub use anon::{Anchors, AnonymousObject, collect_signature, collect_type};
pub use describe::{Style, TypeDescriber};
pub use table::TableRenderer;
