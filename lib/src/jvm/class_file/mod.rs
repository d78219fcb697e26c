//! Read class metadata straight out of class files
//!
//! Only the start of a class file (up to the list of implemented interfaces) matters for type
//! hierarchies, so that is all that gets parsed.

mod binary_format;
mod class_path;
mod constants;
mod header;

pub use binary_format::*;
pub use class_path::*;
pub use constants::*;
pub use header::*;
