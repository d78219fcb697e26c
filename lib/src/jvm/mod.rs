//! JVM class and type vocabulary
//!
//! Types are identified by their descriptors ([`TypeRef`]), classes by their binary names
//! ([`BinaryName`]). The two concrete metadata sources also live here:
//!
//!   - [`class_graph::ClassGraph`], an in-memory graph of declared classes
//!   - [`class_file::ClassPath`], which reads just the header of `.class` files on disk
//!
//! ```
//! use typehierarchy::jvm::class_graph::{ClassData, ClassGraph};
//! use typehierarchy::jvm::{BinaryName, TypeRef};
//! use typehierarchy::hierarchy::{HierarchyResolver, TypeHierarchy};
//!
//! # fn main() -> Result<(), typehierarchy::jvm::Error> {
//! let class_graph = ClassGraph::new();
//! class_graph.insert_java_library_types();
//! class_graph.add_class(ClassData::new(
//!     BinaryName::from_string(String::from("me/alec/Point")).unwrap(),
//!     BinaryName::OBJECT,
//!     false,
//! ));
//!
//! let resolver = HierarchyResolver::new(&class_graph);
//! let point = TypeRef::from_internal_name("me/alec/Point")?;
//! assert_eq!(resolver.superclass_of(&point)?, Some(TypeRef::OBJECT));
//! assert!(!resolver.is_assignable_from(&TypeRef::object(BinaryName::STRING), &point)?);
//! # Ok(())
//! # }
//! ```

mod access_flags;
pub mod class_file;
pub mod class_graph;
mod descriptors;
mod errors;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
