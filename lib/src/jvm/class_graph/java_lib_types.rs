use super::{BinaryName, ClassData, ClassGraph};

fn class(
    class_graph: &ClassGraph,
    name: BinaryName,
    superclass: BinaryName,
    interfaces: &[BinaryName],
) {
    class_graph.add_class(ClassData::with_interfaces(
        name,
        Some(superclass),
        interfaces.iter().cloned(),
        false,
    ));
}

fn interface(class_graph: &ClassGraph, name: BinaryName, interfaces: &[BinaryName]) {
    class_graph.add_class(ClassData::with_interfaces(
        name,
        Some(BinaryName::OBJECT),
        interfaces.iter().cloned(),
        true,
    ));
}

/// Classes inside `java.*` that show up in most hierarchies
pub fn add_to_graph(class_graph: &ClassGraph) {
    class_graph.add_class(ClassData::with_interfaces(BinaryName::OBJECT, None, vec![], false));

    // java.io
    interface(class_graph, BinaryName::SERIALIZABLE, &[]);

    // java.lang
    interface(class_graph, BinaryName::CLONEABLE, &[]);
    interface(class_graph, BinaryName::COMPARABLE, &[]);
    interface(class_graph, BinaryName::CHARSEQUENCE, &[]);
    interface(class_graph, BinaryName::ITERABLE, &[]);
    class(
        class_graph,
        BinaryName::STRING,
        BinaryName::OBJECT,
        &[BinaryName::SERIALIZABLE, BinaryName::COMPARABLE, BinaryName::CHARSEQUENCE],
    );
    class(class_graph, BinaryName::NUMBER, BinaryName::OBJECT, &[BinaryName::SERIALIZABLE]);
    class(class_graph, BinaryName::INTEGER, BinaryName::NUMBER, &[BinaryName::COMPARABLE]);
    class(class_graph, BinaryName::LONG, BinaryName::NUMBER, &[BinaryName::COMPARABLE]);
    class(class_graph, BinaryName::THROWABLE, BinaryName::OBJECT, &[BinaryName::SERIALIZABLE]);
    class(class_graph, BinaryName::EXCEPTION, BinaryName::THROWABLE, &[]);
    class(class_graph, BinaryName::RUNTIMEEXCEPTION, BinaryName::EXCEPTION, &[]);

    // java.util
    interface(class_graph, BinaryName::COLLECTION, &[BinaryName::ITERABLE]);
    interface(class_graph, BinaryName::LIST, &[BinaryName::COLLECTION]);
    interface(class_graph, BinaryName::RANDOMACCESS, &[]);
    class(
        class_graph,
        BinaryName::ABSTRACTCOLLECTION,
        BinaryName::OBJECT,
        &[BinaryName::COLLECTION],
    );
    class(
        class_graph,
        BinaryName::ABSTRACTLIST,
        BinaryName::ABSTRACTCOLLECTION,
        &[BinaryName::LIST],
    );
    class(
        class_graph,
        BinaryName::ARRAYLIST,
        BinaryName::ABSTRACTLIST,
        &[
            BinaryName::LIST,
            BinaryName::RANDOMACCESS,
            BinaryName::CLONEABLE,
            BinaryName::SERIALIZABLE,
        ],
    );
}
