//! Stream layout knowledge
//!
//! [`revision`] holds the threshold table every layout decision is made from;
//! [`header`] parses the fixed part at the start of each upload.

pub mod header;
pub mod revision;

pub use revision::{FieldSet, HeaderFields, Layout, fields_for, layout_for};
