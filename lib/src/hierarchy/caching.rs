use super::{TypeEdge, TypeHierarchy};
use crate::jvm::{Result, TypeRef};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Memoizes [`TypeHierarchy::edge_of`] of another hierarchy, keyed by type
///
/// All of the shared algorithms run over the cache, so after the first query touching a type its
/// metadata is never read again. Edges are computed without holding any lock on the map: two
/// threads missing on the same type concurrently will both ask the inner hierarchy, but only the
/// first answer is published and every caller gets that published edge back. Failed lookups are
/// not cached, so they are retried on the next query.
///
/// The map can be supplied by the caller (see [`EdgeCache::with_map`]) to pre-seed it or to share
/// it between caches over the same metadata.
pub struct EdgeCache<H> {
    inner: H,
    edges: Arc<DashMap<TypeRef, Arc<TypeEdge>>>,
}

impl<H: TypeHierarchy> EdgeCache<H> {
    pub fn new(inner: H) -> EdgeCache<H> {
        EdgeCache {
            inner,
            edges: Arc::new(DashMap::new()),
        }
    }

    pub fn with_capacity(inner: H, capacity: usize) -> EdgeCache<H> {
        EdgeCache {
            inner,
            edges: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Cache backed by an existing map
    ///
    /// Edges already in the map are trusted as is.
    pub fn with_map(inner: H, edges: Arc<DashMap<TypeRef, Arc<TypeEdge>>>) -> EdgeCache<H> {
        EdgeCache { inner, edges }
    }

    pub fn map(&self) -> &Arc<DashMap<TypeRef, Arc<TypeEdge>>> {
        &self.edges
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Number of cached edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<H: TypeHierarchy> TypeHierarchy for EdgeCache<H> {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        if let Some(edge) = self.edges.get(typ) {
            return Ok(Arc::clone(edge.value()));
        }

        let edge = self.inner.edge_of(typ)?;
        match self.edges.entry(typ.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                log::trace!("Caching edge of '{}'", typ);
                Ok(Arc::clone(entry.insert(edge).value()))
            }
        }
    }
}

/// Memoizes [`TypeHierarchy::is_assignable_from`] of another hierarchy, keyed by `(to, from)`
///
/// Edge queries are passed straight through, so this composes with [`EdgeCache`] underneath
/// when both granularities are wanted. The publication rules are those of [`EdgeCache`].
pub struct AssignabilityCache<H> {
    inner: H,
    assignable: Arc<DashMap<(TypeRef, TypeRef), bool>>,
}

impl<H: TypeHierarchy> AssignabilityCache<H> {
    pub fn new(inner: H) -> AssignabilityCache<H> {
        AssignabilityCache {
            inner,
            assignable: Arc::new(DashMap::new()),
        }
    }

    pub fn with_capacity(inner: H, capacity: usize) -> AssignabilityCache<H> {
        AssignabilityCache {
            inner,
            assignable: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Cache backed by an existing map of `(to, from)` pairs
    pub fn with_map(
        inner: H,
        assignable: Arc<DashMap<(TypeRef, TypeRef), bool>>,
    ) -> AssignabilityCache<H> {
        AssignabilityCache { inner, assignable }
    }

    pub fn map(&self) -> &Arc<DashMap<(TypeRef, TypeRef), bool>> {
        &self.assignable
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Number of cached `(to, from)` pairs
    pub fn len(&self) -> usize {
        self.assignable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignable.is_empty()
    }
}

impl<H: TypeHierarchy> TypeHierarchy for AssignabilityCache<H> {
    fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
        self.inner.edge_of(typ)
    }

    fn is_interface(&self, typ: &TypeRef) -> Result<bool> {
        self.inner.is_interface(typ)
    }

    fn superclass_of(&self, typ: &TypeRef) -> Result<Option<TypeRef>> {
        self.inner.superclass_of(typ)
    }

    fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
        let key = (to.clone(), from.clone());
        if let Some(assignable) = self.assignable.get(&key) {
            return Ok(*assignable.value());
        }

        let assignable = self.inner.is_assignable_from(to, from)?;
        Ok(*self.assignable.entry(key).or_insert(assignable).value())
    }
}

#[cfg(test)]
mod test {
    use super::{AssignabilityCache, EdgeCache};
    use dashmap::DashMap;
    use crate::hierarchy::fixtures::{class_graph, typ};
    use crate::hierarchy::{HierarchyResolver, MetadataSource, TypeEdge, TypeHierarchy};
    use crate::jvm::class_graph::ClassGraph;
    use crate::jvm::{BinaryName, Result, SourceError, TypeRef};
    use std::io::{Error as IoError, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fixture graph that counts how often it is asked for metadata
    struct CountingSource {
        graph: ClassGraph,
        reads: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> CountingSource {
            CountingSource {
                graph: class_graph(),
                reads: AtomicUsize::new(0),
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl MetadataSource for CountingSource {
        fn read_type_edge(&self, name: &BinaryName) -> std::result::Result<TypeEdge, SourceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.graph.read_type_edge(name)
        }
    }

    /// Hierarchy that counts assignability queries reaching it
    struct CountingQueries<H> {
        inner: H,
        queries: AtomicUsize,
    }

    impl<H: TypeHierarchy> TypeHierarchy for CountingQueries<H> {
        fn edge_of(&self, typ: &TypeRef) -> Result<Arc<TypeEdge>> {
            self.inner.edge_of(typ)
        }

        fn is_assignable_from(&self, to: &TypeRef, from: &TypeRef) -> Result<bool> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.is_assignable_from(to, from)
        }
    }

    #[test]
    fn edges_are_read_once() {
        let source = CountingSource::new();
        let cache = EdgeCache::new(HierarchyResolver::new(&source));
        assert!(cache.is_empty());

        let to = typ("Interface");
        let from = typ("ExtendsImplementsInterface");
        assert!(cache.is_assignable_from(&to, &from).unwrap());
        let reads = source.reads();
        assert!(reads > 0);

        assert!(cache.is_assignable_from(&to, &from).unwrap());
        assert!(!cache.is_assignable_from(&from, &to).unwrap());
        assert_eq!(cache.superclass_of(&from).unwrap(), Some(typ("ImplementsInterface")));
        assert_eq!(source.reads(), reads);
        assert!(!cache.is_empty());
    }

    #[test]
    fn builtin_edges_are_cached_too() {
        let source = CountingSource::new();
        let cache = EdgeCache::new(HierarchyResolver::new(&source));

        let array = typ("[[I");
        let first = cache.edge_of(&array).unwrap();
        let second = cache.edge_of(&array).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(source.reads(), 0);
    }

    #[test]
    fn concurrent_lookups_agree() {
        let source = CountingSource::new();
        let cache = EdgeCache::new(HierarchyResolver::new(&source));
        let uncached = HierarchyResolver::new(class_graph());
        let subclass = typ("SubSubclass");

        let edges: Vec<Arc<TypeEdge>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.edge_of(&subclass).unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        let published = cache.edge_of(&subclass).unwrap();
        let expected = uncached.edge_of(&subclass).unwrap();
        assert!(source.reads() >= 1);
        assert!(source.reads() <= 8);
        for edge in &edges {
            assert!(Arc::ptr_eq(edge, &published));
            assert_eq!(edge, &expected);
        }
    }

    #[test]
    fn failures_are_retried() {
        /// Fails on the first read of every class
        struct Flaky {
            graph: ClassGraph,
            failures_left: AtomicUsize,
        }

        impl MetadataSource for Flaky {
            fn read_type_edge(
                &self,
                name: &BinaryName,
            ) -> std::result::Result<TypeEdge, SourceError> {
                let left = self.failures_left.load(Ordering::SeqCst);
                if left > 0 {
                    self.failures_left.store(left - 1, Ordering::SeqCst);
                    return Err(SourceError::from(IoError::new(
                        ErrorKind::Interrupted,
                        "disk hiccup",
                    )));
                }
                self.graph.read_type_edge(name)
            }
        }

        let flaky = Flaky {
            graph: class_graph(),
            failures_left: AtomicUsize::new(1),
        };
        let cache = AssignabilityCache::new(EdgeCache::new(HierarchyResolver::new(&flaky)));
        let to = typ("Superclass");
        let from = typ("Subclass");

        let err = cache.is_assignable_from(&to, &from).unwrap_err();
        assert!(err.is_metadata_unavailable());
        assert!(cache.is_empty());
        assert!(cache.inner().is_empty());

        assert!(cache.is_assignable_from(&to, &from).unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn assignability_pairs_are_memoized() {
        let counting = CountingQueries {
            inner: HierarchyResolver::new(class_graph()),
            queries: AtomicUsize::new(0),
        };
        let cache = AssignabilityCache::new(&counting);

        for _ in 0..3 {
            assert!(cache
                .is_assignable_from(&typ("SuperInterface"), &typ("ImplementsSeveralInterfaces"))
                .unwrap());
            assert!(!cache
                .is_assignable_from(&typ("Subclass"), &typ("OtherSubclass"))
                .unwrap());
        }
        assert_eq!(counting.queries.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);

        // The pair is ordered
        assert!(!cache
            .is_assignable_from(&typ("ImplementsSeveralInterfaces"), &typ("SuperInterface"))
            .unwrap());
        assert_eq!(counting.queries.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn stacked_caches_answer_like_the_resolver() {
        let uncached = HierarchyResolver::new(class_graph());
        let cached = AssignabilityCache::new(EdgeCache::new(HierarchyResolver::new(class_graph())));

        let types = [
            "java/lang/Object",
            "java/lang/Integer",
            "java/util/ArrayList",
            "Superclass",
            "Subclass",
            "SubSubclass",
            "Interface",
            "SubInterface",
            "SuperInterface",
            "ImplementsSeveralInterfaces",
            "ExtendsClassOutwithInterfaceHierarchy",
            "[Interface",
            "[[Subclass",
            "[java/lang/Object",
            "[[I",
        ];
        for to in types {
            for from in types {
                let (to, from) = (typ(to), typ(from));
                assert_eq!(
                    cached.is_assignable_from(&to, &from).unwrap(),
                    uncached.is_assignable_from(&to, &from).unwrap(),
                    "{} from {}",
                    to,
                    from
                );
            }
            assert_eq!(
                cached.superclass_of(&typ(to)).unwrap(),
                uncached.superclass_of(&typ(to)).unwrap()
            );
        }

        assert_eq!(
            cached
                .common_superclass(&typ("SubSubclass"), &typ("OtherSubclass"))
                .unwrap(),
            typ("Superclass")
        );
    }

    #[test]
    fn supplied_maps() {
        let source = CountingSource::new();
        let subclass = typ("Subclass");

        // Pre-seeded edges are never read from the source
        let seeded = DashMap::new();
        seeded.insert(
            subclass.clone(),
            Arc::new(TypeEdge::from_declaration(
                crate::hierarchy::fixtures::name("Subclass"),
                Some(BinaryName::OBJECT),
                vec![],
                false,
            )),
        );
        let cache = EdgeCache::with_map(HierarchyResolver::new(&source), Arc::new(seeded));
        assert_eq!(cache.superclass_of(&subclass).unwrap(), Some(TypeRef::OBJECT));
        assert_eq!(source.reads(), 0);

        // Two caches over one map see each other's edges
        let other = EdgeCache::with_map(HierarchyResolver::new(&source), Arc::clone(cache.map()));
        other.edge_of(&typ("Superclass")).unwrap();
        let reads = source.reads();
        assert_eq!(reads, 1);
        cache.edge_of(&typ("Superclass")).unwrap();
        assert_eq!(source.reads(), reads);
        assert_eq!(cache.len(), 2);

        let pairs = Arc::new(DashMap::new());
        let first = AssignabilityCache::with_map(HierarchyResolver::new(class_graph()), Arc::clone(&pairs));
        let second = AssignabilityCache::with_map(HierarchyResolver::new(class_graph()), pairs);
        assert!(first.is_assignable_from(&typ("Superclass"), &typ("SubSubclass")).unwrap());
        assert_eq!(second.len(), 1);
        assert!(Arc::ptr_eq(first.map(), second.map()));
    }
}
