use super::binary_format::Deserialize;
use crate::jvm::BinaryName;
use byteorder::ReadBytesExt;
use std::io::{Error, ErrorKind, Result};

/// Constant pool entry, as far as the class header needs it
///
/// Only class names and the strings they point to are kept. Everything else is skipped over, but
/// still occupies its slot(s) so that indices line up.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// Class or an interface
    Class { name: u16 },

    /// Constant UTF-8 encoded raw string value (decoded from modified UTF-8)
    Utf8(String),

    /// Any other constant, identified by its tag
    Skipped { tag: u8 },
}

impl Constant {
    /// Number of constant pool slots the constant takes up
    ///
    /// > All 8-byte constants take up two entries in the constant_pool table of the class file.
    pub fn width(&self) -> usize {
        match self {
            Constant::Skipped { tag: 5 | 6 } => 2,
            _ => 1,
        }
    }
}

impl Deserialize for Constant {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        let tag = u8::deserialize(reader)?;
        let skip = match tag {
            1 => {
                let len = u16::deserialize(reader)?;
                let mut buffer = vec![0; len as usize];
                reader.read_exact(&mut buffer)?;
                let string = decode_modified_utf8(&buffer)
                    .map_err(|msg| Error::new(ErrorKind::InvalidData, msg))?;
                return Ok(Constant::Utf8(string));
            }
            7 => {
                let name = u16::deserialize(reader)?;
                return Ok(Constant::Class { name });
            }

            // Integer, Float
            3 | 4 => 4,

            // Long, Double
            5 | 6 => 8,

            // String, MethodType, Module, Package
            8 | 16 | 19 | 20 => 2,

            // FieldRef, MethodRef, InterfaceMethodRef, NameAndType, Dynamic, InvokeDynamic
            9 | 10 | 11 | 12 | 17 | 18 => 4,

            // MethodHandle
            15 => 3,

            _ => {
                let msg = format!("Invalid constant pool tag {}", tag);
                return Err(Error::new(ErrorKind::InvalidData, msg));
            }
        };

        let mut buffer = [0; 8];
        reader.read_exact(&mut buffer[..skip])?;
        Ok(Constant::Skipped { tag })
    }
}

/// Constant pool of a class file
///
/// Indices start at 1, and the slot after a `Long` or `Double` is unusable.
#[derive(Debug)]
pub struct ConstantPool {
    constants: Vec<Option<Constant>>,
}

impl ConstantPool {
    fn get(&self, index: u16) -> Result<&Constant> {
        match self.constants.get(index as usize) {
            Some(Some(constant)) => Ok(constant),
            _ => {
                let msg = format!("Invalid constant pool index {}", index);
                Err(Error::new(ErrorKind::InvalidData, msg))
            }
        }
    }

    pub fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(string) => Ok(string),
            other => {
                let msg = format!("Expected UTF-8 constant at {}, found {:?}", index, other);
                Err(Error::new(ErrorKind::InvalidData, msg))
            }
        }
    }

    /// Name of the class constant at the given index
    pub fn get_class_name(&self, index: u16) -> Result<BinaryName> {
        match self.get(index)? {
            Constant::Class { name } => BinaryName::from_string(self.get_utf8(*name)?.to_owned())
                .map_err(|msg| Error::new(ErrorKind::InvalidData, msg)),
            other => {
                let msg = format!("Expected class constant at {}, found {:?}", index, other);
                Err(Error::new(ErrorKind::InvalidData, msg))
            }
        }
    }
}

/// Count is `u16` and is one more than the number of usable slots
impl Deserialize for ConstantPool {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        let count = u16::deserialize(reader)? as usize;
        let mut constants: Vec<Option<Constant>> = Vec::with_capacity(count);
        constants.push(None);

        while constants.len() < count {
            let constant = Constant::deserialize(reader)?;
            let width = constant.width();
            constants.push(Some(constant));
            if width == 2 {
                constants.push(None);
            }
        }

        if constants.len() > count {
            let msg = "Eight byte constant in the last constant pool slot";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        Ok(ConstantPool { constants })
    }
}

/// Decode a string in the modified UTF-8 format used by class files
///
/// Null is encoded with two bytes and supplementary characters are encoded as surrogate pairs
/// (each surrogate getting its own three byte sequence). Four byte sequences never appear.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn decode_modified_utf8(bytes: &[u8]) -> std::result::Result<String, String> {
    let mut code_units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut bytes = bytes.iter().copied();

    while let Some(byte) = bytes.next() {
        let code_unit: u16 = if byte & 0b1000_0000 == 0 {
            if byte == 0 {
                return Err(String::from("Unexpected raw null byte"));
            }
            byte as u16
        } else if byte & 0b1110_0000 == 0b1100_0000 {
            let low = continuation_byte(bytes.next())?;
            (byte as u16 & 0x1F) << 6 | low
        } else if byte & 0b1111_0000 == 0b1110_0000 {
            let middle = continuation_byte(bytes.next())?;
            let low = continuation_byte(bytes.next())?;
            (byte as u16 & 0x0F) << 12 | middle << 6 | low
        } else {
            return Err(format!("Invalid leading byte 0x{:02x}", byte));
        };
        code_units.push(code_unit);
    }

    String::from_utf16(&code_units).map_err(|_| String::from("Unpaired surrogate"))
}

fn continuation_byte(byte: Option<u8>) -> std::result::Result<u16, String> {
    match byte {
        Some(byte) if byte & 0b1100_0000 == 0b1000_0000 => Ok((byte & 0x3F) as u16),
        Some(byte) => Err(format!("Invalid continuation byte 0x{:02x}", byte)),
        None => Err(String::from("Truncated multi-byte sequence")),
    }
}
