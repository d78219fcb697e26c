//! Superclass, interface, and assignability queries over class metadata
//!
//! Everything here is computed from [`TypeEdge`]s alone, so answering a question never loads,
//! links, or initializes a class. The capability set is the [`TypeHierarchy`] trait:
//!
//!   - [`HierarchyResolver`] reads edges straight from a [`MetadataSource`]
//!   - [`EdgeCache`] and [`AssignabilityCache`] memoize another hierarchy
//!   - [`VerifierHierarchy`] adds the class currently being analyzed and verifier merge rules
//!
//! A class writer or bytecode verifier should take one of these as configuration instead of
//! asking the runtime.

mod assignable;
mod caching;
mod edge;
mod load_order;
mod source;
mod verifier;

pub use caching::*;
pub use edge::*;
pub use load_order::*;
pub use source::*;
pub use verifier::*;

use crate::jvm::{Error, Result, TypeRef};
use std::sync::Arc;

/// Queries answerable from the declared edges of types
///
/// Only [`TypeHierarchy::edge_of`] is required. The other methods have shared implementations in
/// terms of it, and are overridden by wrappers that can answer them more cheaply.
pub trait TypeHierarchy {
    /// Declared superclass, interfaces, and interface-ness of a type
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>>;

    /// Equivalent to `Class::isInterface`
    fn is_interface(&self, typ: &TypeRef) -> Result<bool> {
        Ok(self.edge_of(typ)?.is_interface)
    }

    /// Equivalent to `Class::getSuperclass`
    fn superclass_of(&self, typ: &TypeRef) -> Result<Option<TypeRef>> {
        Ok(self.edge_of(typ)?.super_type.clone())
    }

    /// Can a value of type `from` be stored in a variable of type `to`?
    ///
    /// This is the erased runtime relation of `Class::isAssignableFrom`.
    fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
        assignable::is_assignable_from(self, to, from)
    }

    /// Closest type reachable from `typ1` by superclass steps that accepts `typ2`
    ///
    /// Interfaces never merge into a common interface: unless one type is assignable to the other
    /// the result for an interface is `java/lang/Object`.
    fn common_superclass(&self, typ1: &TypeRef, typ2: &TypeRef) -> Result<TypeRef> {
        assignable::common_superclass(self, typ1, typ2)
    }

    /// [`TypeHierarchy::common_superclass`] on internal names, as used by class writers when
    /// computing stack map frames
    fn common_super_class_name(&self, type1: &str, type2: &str) -> Result<String> {
        let typ1 = TypeRef::from_internal_name(type1)?;
        let typ2 = TypeRef::from_internal_name(type2)?;
        Ok(self.common_superclass(&typ1, &typ2)?.internal_name())
    }
}

impl<'a, H: TypeHierarchy + ?Sized> TypeHierarchy for &'a H {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        (**self).edge_of(typ)
    }

    fn is_interface(&self, typ: &TypeRef) -> Result<bool> {
        (**self).is_interface(typ)
    }

    fn superclass_of(&self, typ: &TypeRef) -> Result<Option<TypeRef>> {
        (**self).superclass_of(typ)
    }

    fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
        (**self).is_assignable_from(to, from)
    }

    fn common_superclass(&self, typ1: &TypeRef, typ2: &TypeRef) -> Result<TypeRef> {
        (**self).common_superclass(typ1, typ2)
    }
}

impl<H: TypeHierarchy + ?Sized> TypeHierarchy for Arc<H> {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        (**self).edge_of(typ)
    }

    fn is_interface(&self, typ: &TypeRef) -> Result<bool> {
        (**self).is_interface(typ)
    }

    fn superclass_of(&self, typ: &TypeRef) -> Result<Option<TypeRef>> {
        (**self).superclass_of(typ)
    }

    fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
        (**self).is_assignable_from(to, from)
    }

    fn common_superclass(&self, typ1: &TypeRef, typ2: &TypeRef) -> Result<TypeRef> {
        (**self).common_superclass(typ1, typ2)
    }
}

/// Uncached hierarchy reading every edge from a metadata source
///
/// The resolver itself holds no state besides the source, so it can be shared freely between
/// threads (provided the source can). Wrap it in [`EdgeCache`] to avoid reparsing metadata.
pub struct HierarchyResolver<S> {
    source: S,
}

impl<S: MetadataSource> HierarchyResolver<S> {
    pub fn new(source: S) -> HierarchyResolver<S> {
        HierarchyResolver { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: MetadataSource> TypeHierarchy for HierarchyResolver<S> {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        if let Some(edge) = TypeEdge::builtin(typ) {
            return Ok(Arc::new(edge));
        }
        let name = typ
            .class_name()
            .ok_or_else(|| Error::invariant(format!("no metadata can describe '{}'", typ)))?;

        log::trace!("Reading metadata for '{}'", name);
        let edge = self
            .source
            .read_type_edge(name)
            .map_err(|cause| Error::MetadataUnavailable {
                name: name.clone(),
                cause,
            })?;
        edge.validate_for(typ)?;
        Ok(Arc::new(edge))
    }
}
