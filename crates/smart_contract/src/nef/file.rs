use neo_io::{checksum, NeoEncode};

use super::{
    method_token::validate_method_name, MethodToken, NefError, COMPILER_FIELD_SIZE,
    MAX_SCRIPT_SIZE, SOURCE_URL_MAX, TOKENS_MAX,
};

/// A compiled contract module: script, token table and metadata.
///
/// The token table is immutable once the file is built; `CALLT` operands are
/// indices into [`NefFile::tokens`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NefFile {
    pub compiler: String,
    pub source: String,
    pub tokens: Vec<MethodToken>,
    pub script: Vec<u8>,
    pub checksum: u32,
}

impl NefFile {
    /// Builds a module and stamps its checksum. Fails on any layout bound.
    pub fn new(
        compiler: impl Into<String>,
        source: impl Into<String>,
        tokens: Vec<MethodToken>,
        script: Vec<u8>,
    ) -> Result<Self, NefError> {
        let mut nef = Self {
            compiler: compiler.into(),
            source: source.into(),
            tokens,
            script,
            checksum: 0,
        };
        nef.validate()?;
        nef.checksum = nef.compute_checksum();
        Ok(nef)
    }

    pub fn validate(&self) -> Result<(), NefError> {
        if self.compiler.len() > COMPILER_FIELD_SIZE {
            return Err(NefError::CompilerTooLong {
                len: self.compiler.len(),
                max: COMPILER_FIELD_SIZE,
            });
        }
        if self.source.len() >= SOURCE_URL_MAX {
            return Err(NefError::SourceTooLong {
                len: self.source.len(),
                max: SOURCE_URL_MAX,
            });
        }
        if self.tokens.len() > TOKENS_MAX {
            return Err(NefError::TooManyTokens {
                count: self.tokens.len(),
                max: TOKENS_MAX,
            });
        }
        for token in &self.tokens {
            validate_method_name(&token.method)?;
        }
        if self.script.is_empty() {
            return Err(NefError::EmptyScript);
        }
        if self.script.len() > MAX_SCRIPT_SIZE {
            return Err(NefError::ScriptTooLarge {
                len: self.script.len(),
                max: MAX_SCRIPT_SIZE,
            });
        }
        Ok(())
    }

    /// Checksum over every field that precedes it on the wire.
    pub fn compute_checksum(&self) -> u32 {
        let mut buf = Vec::with_capacity(self.size());
        self.encode_without_checksum(&mut buf);
        checksum(&buf)
    }

    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    pub fn token(&self, index: usize) -> Option<&MethodToken> {
        self.tokens.get(index)
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        let tokens: usize = self.tokens.iter().map(|t| t.to_vec().len()).sum();
        4 + COMPILER_FIELD_SIZE
            + neo_io::var_size(self.source.len() as u64)
            + self.source.len()
            + 1
            + neo_io::var_size(self.tokens.len() as u64)
            + tokens
            + 2
            + neo_io::var_size(self.script.len() as u64)
            + self.script.len()
            + 4
    }

    /// Validates and encodes the module.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NefError> {
        self.validate()?;
        Ok(self.to_vec())
    }
}
