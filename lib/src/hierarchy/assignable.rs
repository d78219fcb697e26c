use super::{TypeEdge, TypeHierarchy};
use crate::jvm::{BinaryName, Error, Result, SourceError, TypeRef};
use std::collections::HashSet;

/// Runtime assignability, computed from edges alone
///
/// This matches `Class::isAssignableFrom` (and the verifier's `isJavaAssignable`). Direct
/// relationships are checked first, then the search climbs the superclass and interfaces of
/// `from`. The search keeps an explicit stack and never revisits a type, so it terminates on
/// hierarchies with repeated (or even cyclic) interface paths.
pub(super) fn is_assignable_from<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    to: &TypeRef,
    from: &TypeRef,
) -> Result<bool> {
    if to.is_root() {
        return Ok(true);
    }

    // An unknown target is an error, even if `from` could be answered without it
    hierarchy.edge_of(to)?;

    let mut supertypes_to_visit: Vec<TypeRef> = vec![from.clone()];
    let mut dont_revisit: HashSet<TypeRef> = HashSet::new();
    dont_revisit.insert(from.clone());

    while let Some(sub_type) = supertypes_to_visit.pop() {
        if &sub_type == to {
            return Ok(true);
        }

        let edge = hierarchy.edge_of(&sub_type)?;
        match direct_assignability(hierarchy, to, &edge)? {
            Some(true) => return Ok(true),
            Some(false) => continue,
            None => (),
        }

        // Superclass goes on top so it is explored before interfaces, which are explored in
        // declaration order. Nothing is gained from climbing to `java/lang/Object`.
        for interface in edge.interfaces.iter().rev() {
            if dont_revisit.insert(interface.clone()) {
                supertypes_to_visit.push(interface.clone());
            }
        }
        if let Some(superclass) = &edge.super_type {
            if !superclass.is_root() && dont_revisit.insert(superclass.clone()) {
                supertypes_to_visit.push(superclass.clone());
            }
        }
    }

    Ok(false)
}

/// Decide assignability from the edge of `from` without climbing further, if possible
fn direct_assignability<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    to: &TypeRef,
    from_edge: &TypeEdge,
) -> Result<Option<bool>> {
    let from = &from_edge.this_type;

    if from_edge.has_direct_supertype(to) {
        return Ok(Some(true));
    }

    if let (Some(to_elem), Some(from_elem)) = (to.element_type(), from.element_type()) {
        let (to_dims, from_dims) = (to.dimensions(), from.dimensions());

        // Cursed (unsound) covariance of arrays
        if to_dims == from_dims {
            let assignable = if to_elem.is_root() {
                from_elem.is_reference()
            } else {
                to_elem.is_reference() == from_elem.is_reference()
                    && is_assignable_from(hierarchy, &to_elem, &from_elem)?
            };
            return Ok(Some(assignable));
        }

        // `from` has extra dimensions, so its elements are arrays and those are only assignable
        // to the fixed supertypes of arrays
        return Ok(Some(
            to_dims < from_dims && is_array_supertype(to_elem.class_name()),
        ));
    }

    if from_edge.extends_root() && from_edge.interfaces.is_empty() {
        return Ok(Some(false));
    }

    Ok(None)
}

/// Check if arrays can be assigned to a super type
///
/// This bakes in knowledge of the small, finite set of super types arrays have.
fn is_array_supertype(super_type: Option<&BinaryName>) -> bool {
    match super_type {
        Some(name) => {
            name == &BinaryName::OBJECT
                || name == &BinaryName::CLONEABLE
                || name == &BinaryName::SERIALIZABLE
        }
        None => false,
    }
}

/// Frame-merge policy for two reference types
///
/// If one type is assignable to the other, that one wins. Otherwise interfaces go straight to
/// `java/lang/Object` and classes climb the superclasses of `typ1` until one accepts `typ2`.
pub(super) fn common_superclass<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    typ1: &TypeRef,
    typ2: &TypeRef,
) -> Result<TypeRef> {
    for typ in [typ1, typ2] {
        if !typ.is_reference() {
            return Err(Error::invariant(format!(
                "primitive '{}' has no common superclass with anything",
                typ
            )));
        }
    }

    if hierarchy.is_assignable_from(typ1, typ2)? {
        return Ok(typ1.clone());
    }
    if hierarchy.is_assignable_from(typ2, typ1)? {
        return Ok(typ2.clone());
    }
    if hierarchy.is_interface(typ1)? || hierarchy.is_interface(typ2)? {
        return Ok(TypeRef::OBJECT);
    }

    let mut current = typ1.clone();
    let mut seen: HashSet<TypeRef> = HashSet::new();
    loop {
        current = match hierarchy.superclass_of(&current)? {
            Some(superclass) => superclass,

            // Only `java/lang/Object` has no superclass, and it accepts everything
            None => return Err(unterminated_superclass_chain(&current)),
        };
        if !seen.insert(current.clone()) {
            return Err(Error::invariant(format!(
                "superclass chain of '{}' loops through '{}'",
                typ1, current
            )));
        }
        if hierarchy.is_assignable_from(&current, typ2)? {
            return Ok(current);
        }
    }
}

pub(super) fn unterminated_superclass_chain(last: &TypeRef) -> Error {
    match last.class_name() {
        Some(name) => Error::MetadataUnavailable {
            name: name.clone(),
            cause: SourceError::malformed(name, "superclass chain ends before java/lang/Object"),
        },
        None => Error::invariant(format!("'{}' has no superclass", last)),
    }
}
