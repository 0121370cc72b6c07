use neo_io::{
    read_fixed_string, read_limited_string, DecodeError, NeoDecode, NeoEncode, NeoRead, NeoWrite,
    SliceReader,
};

use super::{
    MethodToken, NefError, NefFile, COMPILER_FIELD_SIZE, MAX_SCRIPT_SIZE, NEF_MAGIC,
    SOURCE_URL_MAX, TOKENS_MAX,
};

impl NefFile {
    pub(crate) fn encode_without_checksum<W: NeoWrite>(&self, writer: &mut W) {
        writer.write_u32(NEF_MAGIC);
        neo_io::write_fixed_string(writer, &self.compiler, COMPILER_FIELD_SIZE);
        self.source.neo_encode(writer);
        writer.write_u8(0);
        self.tokens.neo_encode(writer);
        writer.write_u16(0);
        writer.write_var_bytes(&self.script);
    }

    /// Decodes a module that must span the whole buffer and carry a valid checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NefError> {
        let mut reader = SliceReader::new(bytes);
        let nef = Self::decode(&mut reader)?;
        match reader.remaining() {
            0 => Ok(nef),
            left => Err(DecodeError::TrailingBytes(left).into()),
        }
    }

    /// Decodes one module from `reader`, enforcing every layout bound.
    pub fn decode<R: NeoRead>(reader: &mut R) -> Result<Self, NefError> {
        let magic = reader.read_u32()?;
        if magic != NEF_MAGIC {
            return Err(NefError::InvalidMagic(magic));
        }
        let compiler = read_fixed_string(reader, COMPILER_FIELD_SIZE, "Nef.compiler")?;
        let source = read_limited_string(reader, SOURCE_URL_MAX - 1, "Nef.source")?;
        if reader.read_u8()? != 0 {
            return Err(NefError::ReservedNotZero("u8"));
        }

        let count = reader.read_varint()?;
        if count > TOKENS_MAX as u64 {
            return Err(NefError::TooManyTokens {
                count: count as usize,
                max: TOKENS_MAX,
            });
        }
        let mut tokens = Vec::with_capacity(count as usize);
        for _ in 0..count {
            tokens.push(MethodToken::neo_decode(reader)?);
        }

        if reader.read_u16()? != 0 {
            return Err(NefError::ReservedNotZero("u16"));
        }
        let script = reader.read_var_bytes(MAX_SCRIPT_SIZE as u64)?;
        if script.is_empty() {
            return Err(NefError::EmptyScript);
        }
        let stored = reader.read_u32()?;

        let nef = Self {
            compiler,
            source,
            tokens,
            script,
            checksum: stored,
        };
        let computed = nef.compute_checksum();
        if stored != computed {
            return Err(NefError::ChecksumMismatch { stored, computed });
        }
        Ok(nef)
    }
}

impl NeoEncode for NefFile {
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        self.encode_without_checksum(writer);
        writer.write_u32(self.checksum);
    }
}

impl NeoDecode for NefFile {
    fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
        Self::decode(reader).map_err(|err| match err {
            NefError::Decode(inner) => inner,
            _ => DecodeError::InvalidValue("NefFile"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_core::UInt160;
    use neo_vm::CallFlags;
    use proptest::prelude::*;

    const SOURCE: &str = "github.com/r3e-network/wallet";
    /// Offset of the reserved byte: magic, compiler field, source length prefix, source.
    const RESERVED_AT: usize = 4 + COMPILER_FIELD_SIZE + 1 + SOURCE.len();
    const TABLE_AT: usize = RESERVED_AT + 1;

    fn module(tokens: Vec<MethodToken>) -> NefFile {
        NefFile::new("neo-devpack-rs", SOURCE, tokens, vec![0x11, 0x40]).unwrap()
    }

    fn token(method: &str, params: u16, flags: CallFlags) -> MethodToken {
        MethodToken::new(UInt160::from_le_array([7; 20]), method, params, true, flags).unwrap()
    }

    #[test]
    fn source_is_var_string() {
        let bytes = module(Vec::new()).to_bytes().unwrap();
        assert_eq!(bytes[4 + COMPILER_FIELD_SIZE] as usize, SOURCE.len());
        assert_eq!(&bytes[4 + COMPILER_FIELD_SIZE + 1..RESERVED_AT], SOURCE.as_bytes());
        assert_eq!(bytes[RESERVED_AT], 0);
    }

    #[test]
    fn token_table_follows_reserved_byte() {
        let nef = module(vec![token("symbol", 0, CallFlags::NONE)]);
        let bytes = nef.to_bytes().unwrap();
        assert_eq!(bytes[TABLE_AT], 1);
        assert_eq!(&bytes[TABLE_AT + 1..TABLE_AT + 21], &[7; 20]);
        assert_eq!(NefFile::from_bytes(&bytes).unwrap(), nef);
    }

    #[test]
    fn rejects_corruption() {
        let bytes = module(vec![token("symbol", 0, CallFlags::NONE)]).to_bytes().unwrap();

        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert!(matches!(NefFile::from_bytes(&bad), Err(NefError::InvalidMagic(_))));

        let mut bad = bytes.clone();
        let last = bad.len() - 1;
        bad[last] ^= 0xff;
        assert!(matches!(
            NefFile::from_bytes(&bad),
            Err(NefError::ChecksumMismatch { .. })
        ));

        let mut bad = bytes.clone();
        bad[RESERVED_AT] = 1;
        assert_eq!(NefFile::from_bytes(&bad), Err(NefError::ReservedNotZero("u8")));

        let mut bad = bytes.clone();
        bad.push(0);
        assert_eq!(
            NefFile::from_bytes(&bad),
            Err(NefError::Decode(DecodeError::TrailingBytes(1)))
        );

        assert!(NefFile::from_bytes(&bytes[..bytes.len() - 2]).is_err());
    }

    #[test]
    fn rejects_oversized_table_count() {
        let mut bytes = module(Vec::new()).to_bytes().unwrap();
        assert_eq!(bytes[TABLE_AT], 0);
        bytes[TABLE_AT] = 129;
        assert_eq!(
            NefFile::from_bytes(&bytes),
            Err(NefError::TooManyTokens { count: 129, max: TOKENS_MAX })
        );
    }

    #[test]
    fn compiler_padding_must_be_zero() {
        let mut bytes = module(Vec::new()).to_bytes().unwrap();
        bytes[4 + 60] = b'x';
        assert!(NefFile::from_bytes(&bytes).is_err());
    }

    proptest! {
        #[test]
        fn distinct_tables_encode_distinctly(
            a in prop::collection::vec((0u16..4, 0u8..16), 0..6),
            b in prop::collection::vec((0u16..4, 0u8..16), 0..6),
        ) {
            let build = |entries: &[(u16, u8)]| {
                module(
                    entries.iter()
                        .map(|(p, f)| token("m", *p, CallFlags::from_byte(*f).unwrap()))
                        .collect(),
                )
            };
            let (na, nb) = (build(&a), build(&b));
            let (ba, bb) = (na.to_bytes().unwrap(), nb.to_bytes().unwrap());
            prop_assert_eq!(a == b, ba == bb);
            prop_assert_eq!(NefFile::from_bytes(&ba).unwrap(), na);
        }
    }
}
