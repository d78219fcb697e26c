use byteorder::{BigEndian, ReadBytesExt};
use std::io::Result;

/// Utility trait for reading data out of class files
///
/// Class files are big-endian throughout, tags are always `u8`, and sequences are usually
/// prefixed with a `u16` length.
pub trait Deserialize: Sized {
    /// Deserialize construct from a binary input stream
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self>;
}

impl Deserialize for u8 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u8()
    }
}

impl Deserialize for u16 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u16::<BigEndian>()
    }
}

impl Deserialize for u32 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u32::<BigEndian>()
    }
}

/// Size in `u16` is the first thing deserialized
impl<A: Deserialize> Deserialize for Vec<A> {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        let len = u16::deserialize(reader)?;
        let mut elems = Vec::with_capacity(len as usize);
        for _ in 0..len {
            elems.push(A::deserialize(reader)?);
        }
        Ok(elems)
    }
}

#[cfg(test)]
mod test {
    use super::Deserialize;
    use std::io::ErrorKind;

    #[test]
    fn big_endian() {
        let mut bytes: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x3D, 0x07];
        assert_eq!(u32::deserialize(&mut bytes).unwrap(), 0xCAFEBABE);
        assert_eq!(u16::deserialize(&mut bytes).unwrap(), 61);
        assert_eq!(u8::deserialize(&mut bytes).unwrap(), 7);
        assert!(bytes.is_empty());
    }

    #[test]
    fn length_prefixed() {
        let mut bytes: &[u8] = &[0x00, 0x02, 0x00, 0x05, 0x01, 0x00];
        assert_eq!(Vec::<u16>::deserialize(&mut bytes).unwrap(), vec![5, 256]);

        let mut truncated: &[u8] = &[0x00, 0x03, 0x00, 0x05];
        let err = Vec::<u16>::deserialize(&mut truncated).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
