use super::TypeEdge;
use crate::jvm::{BinaryName, SourceError};
use std::sync::Arc;

/// Produces the declared edge of a class or interface, typically by parsing class metadata
///
/// Sources are only ever asked about classes and interfaces: edges of primitives, arrays, and
/// `java/lang/Object` are fixed and never requested. A lookup may block (eg. on disk reads), but
/// must not load or initialize the class it describes.
pub trait MetadataSource {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError>;
}

impl<'a, S: MetadataSource + ?Sized> MetadataSource for &'a S {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        (**self).read_type_edge(name)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for Arc<S> {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        (**self).read_type_edge(name)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for Box<S> {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        (**self).read_type_edge(name)
    }
}

/// Consult the first source, falling back to the second only for classes the first doesn't know
///
/// Malformed metadata in the first source is reported rather than papered over.
impl<A: MetadataSource, B: MetadataSource> MetadataSource for (A, B) {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        match self.0.read_type_edge(name) {
            Err(SourceError::NotFound(_)) => self.1.read_type_edge(name),
            other => other,
        }
    }
}

#[cfg(test)]
mod test {
    use super::MetadataSource;
    use crate::hierarchy::TypeEdge;
    use crate::jvm::class_graph::{ClassData, ClassGraph};
    use crate::jvm::{BinaryName, SourceError};

    struct Broken;

    impl MetadataSource for Broken {
        fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
            Err(SourceError::malformed(name, "truncated"))
        }
    }

    #[test]
    fn fallback_only_on_not_found() {
        let first = ClassGraph::new();
        let second = ClassGraph::new();
        second.insert_java_library_types();
        first.add_class(ClassData::new(
            BinaryName::from_string(String::from("me/Local")).unwrap(),
            BinaryName::OBJECT,
            false,
        ));

        let chained = (&first, &second);
        let local = BinaryName::from_string(String::from("me/Local")).unwrap();
        assert!(chained.read_type_edge(&local).is_ok());
        assert!(chained.read_type_edge(&BinaryName::STRING).is_ok());
        assert!(matches!(
            chained.read_type_edge(&BinaryName::from_string(String::from("me/Missing")).unwrap()),
            Err(SourceError::NotFound(_))
        ));

        let broken_first = (Broken, &second);
        assert!(matches!(
            broken_first.read_type_edge(&BinaryName::STRING),
            Err(SourceError::Malformed { .. })
        ));
    }
}
