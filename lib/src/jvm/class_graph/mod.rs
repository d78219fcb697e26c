use super::{BinaryName, SourceError};
use crate::hierarchy::{MetadataSource, TypeEdge};
use elsa::sync::FrozenMap;
use std::fmt;
use std::fmt::Debug;

mod java_lib_types;

/// Tracks the declared superclass and interfaces of classes, without needing any class files
///
/// The graph is append-only and can be shared across threads, so it can be filled in while it is
/// already being queried (eg. as classes are generated). It is a [`MetadataSource`], and is
/// typically paired with a class path to provide the handful of JDK types that matter most.
pub struct ClassGraph {
    classes: FrozenMap<BinaryName, Box<ClassData>>,
}

impl ClassGraph {
    /// New empty graph
    pub fn new() -> Self {
        ClassGraph {
            classes: FrozenMap::new(),
        }
    }

    pub fn lookup_class(&self, name: &BinaryName) -> Option<&ClassData> {
        self.classes.get(name)
    }

    /// Add a new class to the class graph
    ///
    /// Classes are never replaced: if the name is already taken, the existing class is returned.
    pub fn add_class(&self, data: ClassData) -> &ClassData {
        log::trace!("Adding '{}' to class graph", data.name);
        self.classes.insert(data.name.clone(), Box::new(data))
    }

    /// Add standard types to the class graph
    pub fn insert_java_library_types(&self) {
        java_lib_types::add_to_graph(self)
    }
}

impl Default for ClassGraph {
    fn default() -> Self {
        ClassGraph::new()
    }
}

impl MetadataSource for ClassGraph {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        self.lookup_class(name)
            .map(ClassData::type_edge)
            .ok_or_else(|| SourceError::NotFound(name.clone()))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClassData {
    /// Name of the class
    pub name: BinaryName,

    /// Superclass is only ever missing for `java/lang/Object` itself
    pub superclass: Option<BinaryName>,

    /// Interfaces implemented (or super-interfaces)
    pub interfaces: Vec<BinaryName>,

    /// Is this an interface?
    pub is_interface: bool,
}

impl ClassData {
    pub fn new(name: BinaryName, superclass: BinaryName, is_interface: bool) -> ClassData {
        ClassData {
            name,
            superclass: Some(superclass),
            interfaces: vec![],
            is_interface,
        }
    }

    pub fn with_interfaces(
        name: BinaryName,
        superclass: Option<BinaryName>,
        interfaces: impl IntoIterator<Item = BinaryName>,
        is_interface: bool,
    ) -> ClassData {
        ClassData {
            name,
            superclass,
            interfaces: interfaces.into_iter().collect(),
            is_interface,
        }
    }

    /// Edge of the class, as reflection would report it
    pub fn type_edge(&self) -> TypeEdge {
        TypeEdge::from_declaration(
            self.name.clone(),
            self.superclass.clone(),
            self.interfaces.iter().cloned(),
            self.is_interface,
        )
    }
}

impl Debug for ClassData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
