use crate::jvm::{BaseType, BinaryName, Error, TypeRef};

/// Locally declared neighbourhood of one type: its direct superclass, the interfaces it directly
/// implements (or extends, for interfaces), and whether it is an interface
///
/// Edges are produced once per type by a metadata source and never change afterwards.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeEdge {
    /// Type being described
    pub this_type: TypeRef,

    /// Superclass is missing for `java/lang/Object`, primitives, and all interfaces
    pub super_type: Option<TypeRef>,

    /// Interfaces implemented (or super-interfaces), in declaration order
    pub interfaces: Vec<TypeRef>,

    /// Is this an interface?
    pub is_interface: bool,
}

impl TypeEdge {
    /// Edge for a class or interface as it is declared in metadata
    ///
    /// Interfaces have `java/lang/Object` as their superclass in class files, but reflection (and
    /// this crate) report no superclass for them, so the declared superclass of an interface is
    /// dropped.
    pub fn from_declaration(
        name: BinaryName,
        superclass: Option<BinaryName>,
        interfaces: impl IntoIterator<Item = BinaryName>,
        is_interface: bool,
    ) -> TypeEdge {
        TypeEdge {
            this_type: TypeRef::Object(name),
            super_type: if is_interface {
                None
            } else {
                superclass.map(TypeRef::Object)
            },
            interfaces: interfaces.into_iter().map(TypeRef::Object).collect(),
            is_interface,
        }
    }

    /// Edge of `java/lang/Object`, the unique top of the lattice
    pub fn root() -> TypeEdge {
        TypeEdge {
            this_type: TypeRef::OBJECT,
            super_type: None,
            interfaces: vec![],
            is_interface: false,
        }
    }

    /// Primitives have no supertypes at all
    pub fn primitive(base_type: BaseType) -> TypeEdge {
        TypeEdge {
            this_type: TypeRef::Base(base_type),
            super_type: None,
            interfaces: vec![],
            is_interface: false,
        }
    }

    /// Every array, whatever its element type or dimension, extends `java/lang/Object` and
    /// implements `java/lang/Cloneable` and `java/io/Serializable`
    pub fn array(array_type: TypeRef) -> TypeEdge {
        TypeEdge {
            this_type: array_type,
            super_type: Some(TypeRef::OBJECT),
            interfaces: vec![TypeRef::CLONEABLE, TypeRef::SERIALIZABLE],
            is_interface: false,
        }
    }

    /// `java/lang/Cloneable` and `java/io/Serializable` have no super-interfaces
    pub fn array_interface(interface: TypeRef) -> TypeEdge {
        TypeEdge {
            this_type: interface,
            super_type: None,
            interfaces: vec![],
            is_interface: true,
        }
    }

    /// Edges that are fixed by the JVM rather than read from metadata
    ///
    /// This includes the interfaces of arrays, so that array types can be answered for without any
    /// JDK metadata at all.
    pub fn builtin(typ: &TypeRef) -> Option<TypeEdge> {
        match typ {
            TypeRef::Base(base_type) => Some(TypeEdge::primitive(*base_type)),
            TypeRef::ObjectArray(_) | TypeRef::PrimitiveArray(_) => {
                Some(TypeEdge::array(typ.clone()))
            }
            TypeRef::Object(_) if typ.is_root() => Some(TypeEdge::root()),
            TypeRef::Object(_) if typ == &TypeRef::CLONEABLE || typ == &TypeRef::SERIALIZABLE => {
                Some(TypeEdge::array_interface(typ.clone()))
            }
            TypeRef::Object(_) => None,
        }
    }

    /// Is the superclass exactly `java/lang/Object`?
    pub fn extends_root(&self) -> bool {
        matches!(&self.super_type, Some(super_type) if super_type.is_root())
    }

    /// Is the type directly declared as a superclass or interface?
    pub fn has_direct_supertype(&self, typ: &TypeRef) -> bool {
        self.super_type.as_ref() == Some(typ) || self.interfaces.contains(typ)
    }

    /// Check that a metadata source answered the question that was asked
    pub(crate) fn validate_for(&self, requested: &TypeRef) -> Result<(), Error> {
        if &self.this_type != requested {
            return Err(Error::invariant(format!(
                "metadata for '{}' describes '{}'",
                requested, self.this_type
            )));
        }
        if self.has_direct_supertype(&self.this_type) {
            return Err(Error::invariant(format!(
                "'{}' is declared as its own supertype",
                self.this_type
            )));
        }
        Ok(())
    }
}
