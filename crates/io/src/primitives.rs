use super::{DecodeError, NeoDecode, NeoEncode, NeoRead, NeoWrite};

impl NeoEncode for bool {
    #[inline]
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        writer.write_u8(*self as u8);
    }
}

impl NeoDecode for bool {
    #[inline]
    fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidValue("bool")),
        }
    }
}

macro_rules! impl_int {
    ($ty:ty, $write:ident, $read:ident) => {
        impl NeoEncode for $ty {
            #[inline]
            fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
                writer.$write(*self);
            }
        }

        impl NeoDecode for $ty {
            #[inline]
            fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
                reader.$read()
            }
        }
    };
}

impl_int!(u8, write_u8, read_u8);
impl_int!(u16, write_u16, read_u16);
impl_int!(u32, write_u32, read_u32);
impl_int!(u64, write_u64, read_u64);

impl NeoEncode for str {
    #[inline]
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        writer.write_var_bytes(self.as_bytes());
    }
}

impl NeoEncode for String {
    #[inline]
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        self.as_str().neo_encode(writer);
    }
}

impl NeoDecode for String {
    #[inline]
    fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
        read_limited_string(reader, u16::MAX as usize, "string")
    }
}

impl<T: NeoEncode> NeoEncode for [T] {
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        super::write_varint(writer, self.len() as u64);
        for item in self {
            item.neo_encode(writer);
        }
    }
}

impl<T: NeoEncode> NeoEncode for Vec<T> {
    #[inline]
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        self.as_slice().neo_encode(writer);
    }
}

/// Reads a var-string of at most `max` bytes.
pub fn read_limited_string<R: NeoRead>(
    reader: &mut R,
    max: usize,
    field: &'static str,
) -> Result<String, DecodeError> {
    let bytes = reader.read_var_bytes(max as u64)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(field))
}

/// Writes `value` into a zero-padded field of exactly `size` bytes.
///
/// Callers validate the length beforehand; longer input is cut at `size`.
pub fn write_fixed_string<W: NeoWrite>(writer: &mut W, value: &str, size: usize) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(size);
    writer.write_bytes(&bytes[..len]);
    if len < size {
        writer.write_bytes(&vec![0u8; size - len]);
    }
}

/// Reads a zero-padded fixed-size string field.
///
/// Padding must be all zeroes once the first zero byte is seen.
pub fn read_fixed_string<R: NeoRead>(
    reader: &mut R,
    size: usize,
    field: &'static str,
) -> Result<String, DecodeError> {
    let mut buf = vec![0u8; size];
    reader.read_into(&mut buf)?;
    let end = buf.iter().position(|b| *b == 0).unwrap_or(size);
    if buf[end..].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidValue(field));
    }
    buf.truncate(end);
    String::from_utf8(buf).map_err(|_| DecodeError::InvalidUtf8(field))
}
