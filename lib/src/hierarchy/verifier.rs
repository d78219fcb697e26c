use super::{assignable, TypeEdge, TypeHierarchy};
use crate::jvm::{BinaryName, Result, TypeRef};
use std::sync::Arc;

/// Class being analyzed, for which no metadata can be read yet
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CurrentClass {
    pub name: BinaryName,
    pub superclass: Option<BinaryName>,
    pub interfaces: Vec<BinaryName>,
    pub is_interface: bool,
}

impl CurrentClass {
    pub fn new(
        name: BinaryName,
        superclass: Option<BinaryName>,
        interfaces: Vec<BinaryName>,
        is_interface: bool,
    ) -> CurrentClass {
        CurrentClass {
            name,
            superclass,
            interfaces,
            is_interface,
        }
    }

    fn edge(&self) -> TypeEdge {
        TypeEdge::from_declaration(
            self.name.clone(),
            self.superclass.clone(),
            self.interfaces.iter().cloned(),
            self.is_interface,
        )
    }
}

/// Type hierarchy as seen by a bytecode verifier
///
/// Wraps another hierarchy and optionally knows about the class currently being verified, whose
/// edge is answered from the [`CurrentClass`] instead of the metadata source. On top of that it
/// exposes the two verifier-specific checks: [`VerifierHierarchy::is_subtype_of`] (which lets
/// any reference through where an interface is expected) and [`VerifierHierarchy::merge`].
pub struct VerifierHierarchy<H> {
    inner: H,
    current: Option<(CurrentClass, Arc<TypeEdge>)>,
}

impl<H: TypeHierarchy> VerifierHierarchy<H> {
    pub fn new(inner: H) -> VerifierHierarchy<H> {
        VerifierHierarchy {
            inner,
            current: None,
        }
    }

    pub fn with_current_class(inner: H, current: CurrentClass) -> VerifierHierarchy<H> {
        let edge = Arc::new(current.edge());
        VerifierHierarchy {
            inner,
            current: Some((current, edge)),
        }
    }

    pub fn current_class(&self) -> Option<&CurrentClass> {
        self.current.as_ref().map(|(current, _)| current)
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn current_edge_for(&self, typ: &TypeRef) -> Option<&Arc<TypeEdge>> {
        match &self.current {
            Some((_, edge)) if &edge.this_type == typ => Some(edge),
            _ => None,
        }
    }

    /// Can a value of type `value` be used where `expected` is required?
    ///
    /// Interfaces are not checked by the verifier, so an interface type accepts any reference.
    pub fn is_subtype_of(&self, value: &TypeRef, expected: &TypeRef) -> Result<bool> {
        if !expected.is_reference() {
            return Ok(value == expected);
        }
        if !value.is_reference() {
            return Ok(false);
        }
        Ok(self.is_assignable_from(expected, value)? || self.is_interface(expected)?)
    }

    /// Type of a local or stack slot where control flow from two frames joins
    ///
    /// Returns `None` if either type is primitive, in which case the slot is unusable after the
    /// join. References merge into the closest superclass of `typ1` accepting `typ2` (element-wise
    /// for object arrays of equal dimension), or `java/lang/Object` once an interface is involved.
    pub fn merge(&self, typ1: &TypeRef, typ2: &TypeRef) -> Result<Option<TypeRef>> {
        if typ1 == typ2 {
            return Ok(Some(typ1.clone()));
        }
        if !typ1.is_reference() || !typ2.is_reference() {
            return Ok(None);
        }
        if self.is_assignable_from(typ1, typ2)? {
            return Ok(Some(typ1.clone()));
        }
        if self.is_assignable_from(typ2, typ1)? {
            return Ok(Some(typ2.clone()));
        }

        let mut dimensions = 0;
        let mut typ1 = typ1.clone();
        let mut typ2 = typ2.clone();
        if let (TypeRef::ObjectArray(arr1), TypeRef::ObjectArray(arr2)) = (&typ1, &typ2) {
            if arr1.dimensions() == arr2.dimensions() {
                dimensions = arr1.dimensions();
                let elem1 = TypeRef::Object(arr1.element_type.clone());
                let elem2 = TypeRef::Object(arr2.element_type.clone());
                typ1 = elem1;
                typ2 = elem2;
            }
        }

        loop {
            if self.is_interface(&typ1)? {
                return wrap(TypeRef::OBJECT, dimensions).map(Some);
            }
            typ1 = match self.superclass_of(&typ1)? {
                Some(superclass) => superclass,
                None => return wrap(TypeRef::OBJECT, dimensions).map(Some),
            };
            if self.is_assignable_from(&typ1, &typ2)? {
                return wrap(typ1, dimensions).map(Some);
            }
        }
    }
}

fn wrap(element: TypeRef, dimensions: usize) -> Result<TypeRef> {
    if dimensions == 0 {
        Ok(element)
    } else {
        TypeRef::array_of(element, dimensions)
    }
}

impl<H: TypeHierarchy> TypeHierarchy for VerifierHierarchy<H> {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        match self.current_edge_for(typ) {
            Some(edge) => Ok(Arc::clone(edge)),
            None => self.inner.edge_of(typ),
        }
    }

    fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
        if to == from {
            return Ok(true);
        }

        // Anything with a superclass may be stored into the interface being verified
        if let Some(edge) = self.current_edge_for(to) {
            if edge.is_interface {
                return Ok(from.is_reference() && self.superclass_of(from)?.is_some());
            }
        }

        assignable::is_assignable_from(self, to, from)
    }
}
