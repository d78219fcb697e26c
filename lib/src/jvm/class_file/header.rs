use super::binary_format::Deserialize;
use super::constants::ConstantPool;
use crate::hierarchy::TypeEdge;
use crate::jvm::{BinaryName, ClassAccessFlags};
use std::io::{Error, ErrorKind, Result};

/// Start of a class file, up to and including the interfaces
///
/// Fields, methods, and attributes are never looked at, so reading a header is cheap even for
/// large classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: ClassAccessFlags,
    pub this_class: BinaryName,

    /// Only `java/lang/Object` has no superclass
    pub super_class: Option<BinaryName>,

    pub interfaces: Vec<BinaryName>,
}

impl ClassHeader {
    const MAGIC: u32 = 0xCAFEBABE;

    /// Parse the header out of the bytes of a class file
    pub fn parse(bytes: &[u8]) -> Result<ClassHeader> {
        let reader = &mut &bytes[..];

        let magic = u32::deserialize(reader)?;
        if magic != Self::MAGIC {
            let msg = format!("Invalid class file magic 0x{:08x}", magic);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let minor_version = u16::deserialize(reader)?;
        let major_version = u16::deserialize(reader)?;
        let constants = ConstantPool::deserialize(reader)?;

        let access_flags = ClassAccessFlags::from_bits_truncate(u16::deserialize(reader)?);
        let this_class = constants.get_class_name(u16::deserialize(reader)?)?;
        let super_class = match u16::deserialize(reader)? {
            0 => None,
            index => Some(constants.get_class_name(index)?),
        };
        let interfaces = Vec::<u16>::deserialize(reader)?
            .into_iter()
            .map(|index| constants.get_class_name(index))
            .collect::<Result<Vec<BinaryName>>>()?;

        if access_flags.contains(ClassAccessFlags::MODULE) {
            let msg = format!("'{}' is a module descriptor, not a class", this_class);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        if super_class.is_none() && this_class != BinaryName::OBJECT {
            let msg = format!("'{}' has no superclass", this_class);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }

        Ok(ClassHeader {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.is_interface()
    }

    /// Edge of the class, as reflection would report it
    pub fn type_edge(&self) -> TypeEdge {
        TypeEdge::from_declaration(
            self.this_class.clone(),
            self.super_class.clone(),
            self.interfaces.iter().cloned(),
            self.is_interface(),
        )
    }
}


#[cfg(test)]
mod test {
    use super::assemble::class_file;
    use super::ClassHeader;
    use crate::jvm::{BinaryName, ClassAccessFlags, TypeRef};
    use std::io::ErrorKind;

    #[test]
    fn class_header() {
        let bytes = class_file(
            "me/Widget",
            Some("me/Base"),
            &["java/lang/Comparable", "java/io/Serializable"],
            ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        );
        let header = ClassHeader::parse(&bytes).unwrap();

        assert_eq!(header.major_version, 61);
        assert_eq!(header.this_class.as_str(), "me/Widget");
        assert_eq!(header.super_class.as_ref().map(BinaryName::as_str), Some("me/Base"));
        assert_eq!(
            header.interfaces,
            vec![BinaryName::COMPARABLE, BinaryName::SERIALIZABLE]
        );
        assert!(!header.is_interface());

        let edge = header.type_edge();
        assert_eq!(edge.super_type, Some(TypeRef::from_internal_name("me/Base").unwrap()));
        assert_eq!(edge.interfaces.len(), 2);
    }

    #[test]
    fn interface_header() {
        let bytes = class_file(
            "me/Shape",
            Some("java/lang/Object"),
            &["java/lang/Comparable"],
            ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
        );
        let header = ClassHeader::parse(&bytes).unwrap();
        assert!(header.is_interface());
        assert_eq!(header.super_class, Some(BinaryName::OBJECT));

        let edge = header.type_edge();
        assert!(edge.is_interface);
        assert_eq!(edge.super_type, None);
        assert_eq!(edge.interfaces, vec![TypeRef::object(BinaryName::COMPARABLE)]);
    }

    #[test]
    fn object_header() {
        let bytes = class_file("java/lang/Object", None, &[], ClassAccessFlags::PUBLIC);
        let header = ClassHeader::parse(&bytes).unwrap();
        assert_eq!(header.super_class, None);
    }

    #[test]
    fn malformed_headers() {
        let missing_superclass = class_file("me/Orphan", None, &[], ClassAccessFlags::PUBLIC);
        assert_eq!(
            ClassHeader::parse(&missing_superclass).unwrap_err().kind(),
            ErrorKind::InvalidData
        );

        let module = class_file(
            "module-info",
            None,
            &[],
            ClassAccessFlags::MODULE,
        );
        assert_eq!(
            ClassHeader::parse(&module).unwrap_err().kind(),
            ErrorKind::InvalidData
        );

        let mut bad_magic = class_file("me/Widget", Some("me/Base"), &[], ClassAccessFlags::PUBLIC);
        bad_magic[0] = 0xCB;
        assert_eq!(
            ClassHeader::parse(&bad_magic).unwrap_err().kind(),
            ErrorKind::InvalidData
        );

        let complete = class_file("me/Widget", Some("me/Base"), &[], ClassAccessFlags::PUBLIC);
        let truncated = &complete[..complete.len() - 10];
        assert_eq!(
            ClassHeader::parse(truncated).unwrap_err().kind(),
            ErrorKind::UnexpectedEof
        );
    }
}
