use super::{BinaryName, Error};
use std::fmt;
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::iter::Peekable;
use std::str::Chars;

/// Utility trait for converting descriptors to string representations
pub trait RenderDescriptor {
    /// Turn the descriptor into a string
    fn render(&self) -> String {
        let mut string = String::new();
        self.render_to(&mut string);
        string
    }

    /// Write the descriptor to a string
    fn render_to(&self, write_to: &mut String);
}

pub trait ParseDescriptor: Sized {
    /// Parse a descriptor from a string
    fn parse(source: &str) -> IoResult<Self> {
        let mut chars = source.chars().peekable();
        let ret = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(ret),
            Some(c) => {
                let msg = format!("Unexpected leftover input '{}'", c);
                Err(IoError::new(ErrorKind::InvalidInput, msg))
            }
        }
    }

    /// Read the descriptor from a character buffer
    fn parse_from(source: &mut Peekable<Chars>) -> IoResult<Self>;
}

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub const ALL: [BaseType; 8] = [
        BaseType::Byte,
        BaseType::Char,
        BaseType::Double,
        BaseType::Float,
        BaseType::Int,
        BaseType::Long,
        BaseType::Short,
        BaseType::Boolean,
    ];
}

impl RenderDescriptor for BaseType {
    fn render_to(&self, write_to: &mut String) {
        let c = match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        };
        write_to.push(c);
    }
}

impl ParseDescriptor for BaseType {
    fn parse_from(source: &mut Peekable<Chars>) -> IoResult<Self> {
        let typ = match source.next() {
            Some('B') => BaseType::Byte,
            Some('C') => BaseType::Char,
            Some('D') => BaseType::Double,
            Some('F') => BaseType::Float,
            Some('I') => BaseType::Int,
            Some('J') => BaseType::Long,
            Some('S') => BaseType::Short,
            Some('Z') => BaseType::Boolean,
            Some(c) => {
                let msg = format!("Invalid base type character '{}'", c);
                return Err(IoError::new(ErrorKind::InvalidInput, msg));
            }
            None => {
                let msg = "Missing base type character";
                return Err(IoError::new(ErrorKind::UnexpectedEof, msg));
            }
        };
        Ok(typ)
    }
}

/// Generic array type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType<T> {
    /// Additional dimensions (`A[]` has 0 additional dimensions, `A[][][][]` has 3)
    pub additional_dimensions: usize,

    /// Underlying element type (`A` is the underlying element type of `A[][]`)
    pub element_type: T,
}

impl<T> ArrayType<T> {
    /// Total number of dimensions in the array type
    ///
    /// This is always just `additional_dimensions + 1`
    pub const fn dimensions(&self) -> usize {
        self.additional_dimensions + 1
    }
}

impl<T: RenderDescriptor> RenderDescriptor for ArrayType<T> {
    fn render_to(&self, write_to: &mut String) {
        for _ in 0..=self.additional_dimensions {
            write_to.push('[');
        }
        self.element_type.render_to(write_to);
    }
}

impl RenderDescriptor for BinaryName {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('L');
        write_to.push_str(self.as_str());
        write_to.push(';');
    }
}

impl ParseDescriptor for BinaryName {
    fn parse_from(source: &mut Peekable<Chars>) -> IoResult<Self> {
        if let Some('L') = source.next() {
            let mut class_name = String::new();
            loop {
                let c: char = source.next().ok_or_else(|| {
                    let msg = format!("Missing terminator for 'L{}'", class_name);
                    IoError::new(ErrorKind::UnexpectedEof, msg)
                })?;
                if c == ';' {
                    return BinaryName::from_string(class_name)
                        .map_err(|msg| IoError::new(ErrorKind::InvalidInput, msg));
                } else {
                    class_name.push(c)
                }
            }
        } else {
            Err(IoError::new(
                ErrorKind::InvalidInput,
                "Expected object type to start with `L`",
            ))
        }
    }
}

/// Any type a value can have: primitive, class/interface, or array
///
/// Two types are equal exactly when their descriptors are equal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeRef {
    Base(BaseType),
    Object(BinaryName),
    ObjectArray(ArrayType<BinaryName>),
    PrimitiveArray(ArrayType<BaseType>),
}

impl TypeRef {
    /// `java/lang/Object`, the top of the reference type lattice
    pub const OBJECT: TypeRef = TypeRef::Object(BinaryName::OBJECT);

    /// Interfaces every array type implements
    pub const CLONEABLE: TypeRef = TypeRef::Object(BinaryName::CLONEABLE);
    pub const SERIALIZABLE: TypeRef = TypeRef::Object(BinaryName::SERIALIZABLE);

    pub const fn object(name: BinaryName) -> TypeRef {
        TypeRef::Object(name)
    }

    /// Wrap a type in one more array dimension
    pub fn array(element: TypeRef) -> TypeRef {
        match element {
            TypeRef::Base(element_type) => TypeRef::PrimitiveArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            TypeRef::Object(element_type) => TypeRef::ObjectArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            TypeRef::PrimitiveArray(arr) => TypeRef::PrimitiveArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
            TypeRef::ObjectArray(arr) => TypeRef::ObjectArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
        }
    }

    /// Array with an explicit number of dimensions around a non-array element
    pub fn array_of(element: TypeRef, dimensions: usize) -> Result<TypeRef, Error> {
        if dimensions == 0 {
            return Err(Error::invariant(format!(
                "array of '{}' must have at least one dimension",
                element
            )));
        }
        let additional_dimensions = dimensions - 1;
        match element {
            TypeRef::Base(element_type) => Ok(TypeRef::PrimitiveArray(ArrayType {
                additional_dimensions,
                element_type,
            })),
            TypeRef::Object(element_type) => Ok(TypeRef::ObjectArray(ArrayType {
                additional_dimensions,
                element_type,
            })),
            arr @ (TypeRef::ObjectArray(_) | TypeRef::PrimitiveArray(_)) => Err(Error::invariant(
                format!("array element '{}' is itself an array", arr),
            )),
        }
    }

    /// Parse a field descriptor such as `I`, `Ljava/lang/String;`, or `[[J`
    pub fn parse_descriptor(descriptor: &str) -> Result<TypeRef, Error> {
        TypeRef::parse(descriptor).map_err(|err| {
            Error::invariant(format!("bad descriptor '{}': {}", descriptor, err))
        })
    }

    /// Parse the form class files use to name classes
    ///
    /// That is a binary name for classes and interfaces (`java/lang/String`), but a descriptor
    /// for arrays (`[Ljava/lang/String;`).
    pub fn from_internal_name(name: &str) -> Result<TypeRef, Error> {
        if name.starts_with('[') {
            TypeRef::parse_descriptor(name)
        } else {
            BinaryName::from_string(name.to_owned())
                .map(TypeRef::Object)
                .map_err(Error::invariant)
        }
    }

    /// Inverse of [`TypeRef::from_internal_name`] (primitives render as their descriptor)
    pub fn internal_name(&self) -> String {
        match self {
            TypeRef::Object(name) => name.as_str().to_owned(),
            other => other.render(),
        }
    }

    /// Is this `java/lang/Object`?
    pub fn is_root(&self) -> bool {
        matches!(self, TypeRef::Object(name) if name == &BinaryName::OBJECT)
    }

    /// Is this a reference (class, interface, or array) type?
    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeRef::Base(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::ObjectArray(_) | TypeRef::PrimitiveArray(_))
    }

    /// Number of array dimensions (zero for non-array types)
    pub fn dimensions(&self) -> usize {
        match self {
            TypeRef::Base(_) | TypeRef::Object(_) => 0,
            TypeRef::ObjectArray(arr) => arr.dimensions(),
            TypeRef::PrimitiveArray(arr) => arr.dimensions(),
        }
    }

    /// Innermost element type of an array (`A` for `A[][]`)
    pub fn element_type(&self) -> Option<TypeRef> {
        match self {
            TypeRef::Base(_) | TypeRef::Object(_) => None,
            TypeRef::ObjectArray(arr) => Some(TypeRef::Object(arr.element_type.clone())),
            TypeRef::PrimitiveArray(arr) => Some(TypeRef::Base(arr.element_type)),
        }
    }

    /// Class or interface name, if this is a class or interface type
    pub fn class_name(&self) -> Option<&BinaryName> {
        match self {
            TypeRef::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl From<BinaryName> for TypeRef {
    fn from(name: BinaryName) -> TypeRef {
        TypeRef::Object(name)
    }
}

impl From<BaseType> for TypeRef {
    fn from(base: BaseType) -> TypeRef {
        TypeRef::Base(base)
    }
}

impl RenderDescriptor for TypeRef {
    fn render_to(&self, write_to: &mut String) {
        match self {
            TypeRef::Base(base_type) => base_type.render_to(write_to),
            TypeRef::Object(cls) => cls.render_to(write_to),
            TypeRef::ObjectArray(arr) => arr.render_to(write_to),
            TypeRef::PrimitiveArray(arr) => arr.render_to(write_to),
        }
    }
}

impl ParseDescriptor for TypeRef {
    fn parse_from(source: &mut Peekable<Chars>) -> IoResult<Self> {
        Ok(match source.peek().copied() {
            Some('B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z') => {
                TypeRef::Base(BaseType::parse_from(source)?)
            }
            Some('L') => TypeRef::Object(BinaryName::parse_from(source)?),
            Some('[') => {
                source.next();
                let mut additional_dimensions = 0;
                while source.next_if_eq(&'[').is_some() {
                    additional_dimensions += 1;
                }
                if let Some('L') = source.peek().copied() {
                    TypeRef::ObjectArray(ArrayType {
                        additional_dimensions,
                        element_type: BinaryName::parse_from(source)?,
                    })
                } else {
                    TypeRef::PrimitiveArray(ArrayType {
                        additional_dimensions,
                        element_type: BaseType::parse_from(source)?,
                    })
                }
            }
            Some(c) => {
                let msg = format!("Invalid field type character '{}'", c);
                return Err(IoError::new(ErrorKind::InvalidInput, msg));
            }
            None => {
                let msg = "Missing field type";
                return Err(IoError::new(ErrorKind::UnexpectedEof, msg));
            }
        })
    }
}

/// Displays the internal name
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.internal_name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_and_render() {
        for descriptor in [
            "I",
            "Z",
            "Ljava/lang/String;",
            "[I",
            "[[J",
            "[Ljava/lang/Object;",
            "[[[Ljava/util/List;",
        ] {
            let parsed = TypeRef::parse_descriptor(descriptor).unwrap();
            assert_eq!(parsed.render(), descriptor);
        }
    }

    #[test]
    fn parse_structure() {
        assert_eq!(
            TypeRef::parse_descriptor("[[Ljava/lang/String;").unwrap(),
            TypeRef::ObjectArray(ArrayType {
                additional_dimensions: 1,
                element_type: BinaryName::STRING,
            })
        );
        assert_eq!(
            TypeRef::parse_descriptor("[D").unwrap(),
            TypeRef::PrimitiveArray(ArrayType {
                additional_dimensions: 0,
                element_type: BaseType::Double,
            })
        );
    }

    #[test]
    fn bad_descriptors() {
        for descriptor in ["", "V", "[", "Ljava/lang/String", "II", "[Q", "Ljava.lang.String;"] {
            let err = TypeRef::parse_descriptor(descriptor).unwrap_err();
            assert!(
                matches!(err, Error::InvariantViolation(_)),
                "{:?} should not parse",
                descriptor
            );
        }
    }

    #[test]
    fn internal_names() {
        let string = TypeRef::from_internal_name("java/lang/String").unwrap();
        assert_eq!(string, TypeRef::Object(BinaryName::STRING));
        assert_eq!(string.internal_name(), "java/lang/String");

        let array = TypeRef::from_internal_name("[Ljava/lang/String;").unwrap();
        assert_eq!(array, TypeRef::array(string));
        assert_eq!(array.internal_name(), "[Ljava/lang/String;");

        assert!(TypeRef::from_internal_name("java.lang.String").is_err());
    }

    #[test]
    fn array_construction() {
        let int_arr = TypeRef::array_of(TypeRef::Base(BaseType::Int), 3).unwrap();
        assert_eq!(int_arr.render(), "[[[I");
        assert_eq!(int_arr.dimensions(), 3);
        assert_eq!(int_arr.element_type(), Some(TypeRef::Base(BaseType::Int)));
        assert_eq!(
            TypeRef::array(TypeRef::array(TypeRef::Base(BaseType::Int))),
            TypeRef::array_of(TypeRef::Base(BaseType::Int), 2).unwrap()
        );

        assert!(TypeRef::array_of(TypeRef::OBJECT, 0).is_err());
        assert!(TypeRef::array_of(int_arr, 1).is_err());
    }

    #[test]
    fn classification() {
        assert!(TypeRef::OBJECT.is_root());
        assert!(!TypeRef::array(TypeRef::OBJECT).is_root());
        assert!(TypeRef::array(TypeRef::Base(BaseType::Int)).is_reference());
        assert!(!TypeRef::Base(BaseType::Int).is_reference());
        assert_eq!(TypeRef::OBJECT.dimensions(), 0);
        assert_eq!(TypeRef::OBJECT.element_type(), None);
    }
}
