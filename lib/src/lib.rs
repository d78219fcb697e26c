//! Answer JVM type hierarchy questions (superclasses, interfaces, assignability, common
//! superclasses, load order) from class metadata, without loading any classes.
//!
//! The [`jvm`] module has the type vocabulary and the metadata sources; [`hierarchy`] has the
//! queries themselves.

pub mod hierarchy;
pub mod jvm;
