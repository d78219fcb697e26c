use std::borrow::Cow;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

/// Names of classes and interfaces
///
/// These are in internal form, so `java/lang/String` rather than `java.lang.String`.
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.1>
#[derive(Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct BinaryName(Cow<'static, str>);

/// Extracts the raw underlying string name
impl AsRef<str> for BinaryName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl BinaryName {
    /// Check if a string would be a valid binary name
    pub fn check_valid(name: impl AsRef<str>) -> Result<(), String> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(format!("Binary name '{}' is empty", name))
        } else {
            name.split('/').map(check_valid_segment).collect()
        }
    }

    /// Try to construct a name from a string
    pub fn from_string(name: String) -> Result<Self, String> {
        match Self::check_valid(&name) {
            Ok(()) => Ok(BinaryName(Cow::Owned(name))),
            Err(msg) => Err(msg),
        }
    }

    /// Extract the raw underlying string name
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    /// Name as it would appear in Java source (`java.lang.String`)
    pub fn to_source_name(&self) -> String {
        self.as_str().replace('/', ".")
    }

    const fn name(value: &'static str) -> BinaryName {
        BinaryName(Cow::Borrowed(value))
    }

    // JDK names
    pub const ABSTRACTCOLLECTION: Self = Self::name("java/util/AbstractCollection");
    pub const ABSTRACTLIST: Self = Self::name("java/util/AbstractList");
    pub const ARRAYLIST: Self = Self::name("java/util/ArrayList");
    pub const CHARSEQUENCE: Self = Self::name("java/lang/CharSequence");
    pub const CLONEABLE: Self = Self::name("java/lang/Cloneable");
    pub const COLLECTION: Self = Self::name("java/util/Collection");
    pub const COMPARABLE: Self = Self::name("java/lang/Comparable");
    pub const EXCEPTION: Self = Self::name("java/lang/Exception");
    pub const INTEGER: Self = Self::name("java/lang/Integer");
    pub const ITERABLE: Self = Self::name("java/lang/Iterable");
    pub const LIST: Self = Self::name("java/util/List");
    pub const LONG: Self = Self::name("java/lang/Long");
    pub const NUMBER: Self = Self::name("java/lang/Number");
    pub const OBJECT: Self = Self::name("java/lang/Object");
    pub const RANDOMACCESS: Self = Self::name("java/util/RandomAccess");
    pub const RUNTIMEEXCEPTION: Self = Self::name("java/lang/RuntimeException");
    pub const SERIALIZABLE: Self = Self::name("java/io/Serializable");
    pub const STRING: Self = Self::name("java/lang/String");
    pub const THROWABLE: Self = Self::name("java/lang/Throwable");
}

/// Segments between `/` follow the rules for unqualified names
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.2>
fn check_valid_segment(segment: &str) -> Result<(), String> {
    if segment.contains(&['.', ';', '['][..]) {
        Err(format!(
            "Name segment '{}' contains an illegal character",
            segment
        ))
    } else if segment.is_empty() {
        Err(String::from("Name segment is empty"))
    } else {
        Ok(())
    }
}

impl Debug for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}
