use super::{assignable, TypeHierarchy};
use crate::jvm::{Error, Result, TypeRef};
use std::collections::HashSet;

/// Linearizes the supertypes of a type so that it is safe to load them in order
///
/// Loading the types in the order returned never loads a class before its superclass or an
/// interface before its super-interfaces. Types reachable through several paths appear once per
/// path. Only the interfaces `typ` itself declares (and their super-interfaces) are listed, not
/// those of its superclasses.
pub struct LoadOrderResolver<H> {
    hierarchy: H,
}

enum Visit {
    Enter(TypeRef),
    Exit,
}

impl<H: TypeHierarchy> LoadOrderResolver<H> {
    pub fn new(hierarchy: H) -> LoadOrderResolver<H> {
        LoadOrderResolver { hierarchy }
    }

    pub fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    /// `java/lang/Object` first, then interfaces, then superclasses, and `typ` last
    pub fn load_order(&self, typ: &TypeRef) -> Result<Vec<TypeRef>> {
        if typ.is_root() {
            return Ok(vec![TypeRef::OBJECT]);
        }

        // Built back to front, then reversed
        let mut loading_order: Vec<TypeRef> = vec![typ.clone()];
        let edge = self.hierarchy.edge_of(typ)?;

        if !edge.is_interface {
            self.push_superclasses(typ, edge.super_type.clone(), &mut loading_order)?;
        }
        self.push_interfaces(typ, &edge.interfaces, &mut loading_order)?;

        loading_order.push(TypeRef::OBJECT);
        loading_order.reverse();
        log::debug!("Load order of '{}' has {} entries", typ, loading_order.len());
        Ok(loading_order)
    }

    /// Superclass chain from the direct superclass upwards, stopping before the root
    fn push_superclasses(
        &self,
        typ: &TypeRef,
        mut superclass: Option<TypeRef>,
        loading_order: &mut Vec<TypeRef>,
    ) -> Result<()> {
        let mut seen: HashSet<TypeRef> = HashSet::new();
        seen.insert(typ.clone());

        let mut last = typ.clone();
        loop {
            let current = match superclass {
                None => return Err(assignable::unterminated_superclass_chain(&last)),
                Some(current) if current.is_root() => return Ok(()),
                Some(current) => current,
            };
            if !seen.insert(current.clone()) {
                return Err(Error::invariant(format!(
                    "superclass chain of '{}' loops through '{}'",
                    typ, current
                )));
            }
            superclass = self.hierarchy.superclass_of(&current)?;
            loading_order.push(current.clone());
            last = current;
        }
    }

    /// Pre-order walk of the interfaces and their super-interfaces, in declaration order
    fn push_interfaces(
        &self,
        typ: &TypeRef,
        interfaces: &[TypeRef],
        loading_order: &mut Vec<TypeRef>,
    ) -> Result<()> {
        let mut path: Vec<TypeRef> = vec![typ.clone()];
        let mut to_visit: Vec<Visit> = interfaces
            .iter()
            .rev()
            .map(|interface| Visit::Enter(interface.clone()))
            .collect();

        while let Some(visit) = to_visit.pop() {
            let interface = match visit {
                Visit::Enter(interface) => interface,
                Visit::Exit => {
                    path.pop();
                    continue;
                }
            };
            if path.contains(&interface) {
                return Err(Error::invariant(format!(
                    "interface '{}' of '{}' is its own super-interface",
                    interface, typ
                )));
            }

            let edge = self.hierarchy.edge_of(&interface)?;
            loading_order.push(interface.clone());
            path.push(interface);
            to_visit.push(Visit::Exit);
            to_visit.extend(
                edge.interfaces
                    .iter()
                    .rev()
                    .map(|super_interface| Visit::Enter(super_interface.clone())),
            );
        }
        Ok(())
    }
}
