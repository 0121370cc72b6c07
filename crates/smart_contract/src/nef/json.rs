use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{
    de::{Error as DeError, MapAccess, Visitor},
    ser::SerializeStruct,
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::{MethodToken, NefFile, NEF_MAGIC};

impl Serialize for NefFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NefFile", 6)?;
        state.serialize_field("magic", &NEF_MAGIC)?;
        state.serialize_field("compiler", &self.compiler)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("tokens", &self.tokens)?;
        state.serialize_field("script", &BASE64.encode(&self.script))?;
        state.serialize_field("checksum", &self.checksum)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChecksumRepr {
    Number(u32),
    Text(String),
}

impl ChecksumRepr {
    fn into_u32<E: DeError>(self) -> Result<u32, E> {
        match self {
            ChecksumRepr::Number(value) => Ok(value),
            ChecksumRepr::Text(text) => {
                let digits = text.trim_start_matches("0x").trim_start_matches("0X");
                u32::from_str_radix(digits, 16).map_err(|_| E::custom("invalid checksum hex"))
            }
        }
    }
}

impl<'de> Deserialize<'de> for NefFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(field_identifier, rename_all = "lowercase")]
        enum Field {
            Magic,
            Compiler,
            Source,
            Tokens,
            Script,
            Checksum,
        }

        struct NefVisitor;

        impl<'de> Visitor<'de> for NefVisitor {
            type Value = NefFile;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("NEF file")
            }

            fn visit_map<M>(self, mut access: M) -> Result<NefFile, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut compiler = None;
                let mut source = None;
                let mut tokens: Option<Vec<MethodToken>> = None;
                let mut script = None;
                let mut checksum = None;
                while let Some(field) = access.next_key::<Field>()? {
                    match field {
                        Field::Magic => {
                            let magic: u32 = access.next_value()?;
                            if magic != NEF_MAGIC {
                                return Err(DeError::custom("invalid NEF magic"));
                            }
                        }
                        Field::Compiler => compiler = Some(access.next_value()?),
                        Field::Source => source = Some(access.next_value()?),
                        Field::Tokens => tokens = Some(access.next_value()?),
                        Field::Script => {
                            let encoded: String = access.next_value()?;
                            let bytes = BASE64
                                .decode(encoded.trim().as_bytes())
                                .map_err(|err| DeError::custom(err.to_string()))?;
                            script = Some(bytes);
                        }
                        Field::Checksum => {
                            let repr: ChecksumRepr = access.next_value()?;
                            checksum = Some(repr.into_u32()?);
                        }
                    }
                }

                let nef = NefFile {
                    compiler: compiler.ok_or_else(|| DeError::missing_field("compiler"))?,
                    source: source.unwrap_or_default(),
                    tokens: tokens.unwrap_or_default(),
                    script: script.ok_or_else(|| DeError::missing_field("script"))?,
                    checksum: checksum.ok_or_else(|| DeError::missing_field("checksum"))?,
                };
                nef.validate().map_err(DeError::custom)?;
                if !nef.verify_checksum() {
                    return Err(DeError::custom("checksum mismatch"));
                }
                Ok(nef)
            }
        }

        deserializer.deserialize_struct(
            "NefFile",
            &["magic", "compiler", "source", "tokens", "script", "checksum"],
            NefVisitor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_core::UInt160;
    use neo_vm::CallFlags;
    use serde_json::json;

    fn sample() -> NefFile {
        let token = MethodToken::new(
            UInt160::parse("0xd2a4cff31913016155e38e474a2c06d08be276cf").unwrap(),
            "totalSupply",
            0,
            true,
            CallFlags::READ_ONLY,
        )
        .unwrap();
        NefFile::new("neo-devpack-rs", "", vec![token], vec![0x37, 0x00, 0x00, 0x40]).unwrap()
    }

    #[test]
    fn json_shape() {
        let nef = sample();
        let value = serde_json::to_value(&nef).unwrap();
        assert_eq!(value["magic"], json!(NEF_MAGIC));
        assert_eq!(value["script"], json!("NwAAQA=="));
        assert_eq!(value["checksum"], json!(nef.checksum));
        assert_eq!(
            value["tokens"][0]["hash"],
            json!("0xd2a4cff31913016155e38e474a2c06d08be276cf")
        );
        let back: NefFile = serde_json::from_value(value).unwrap();
        assert_eq!(back, nef);
    }

    #[test]
    fn accepts_hex_checksum_and_rejects_tampering() {
        let nef = sample();
        let mut value = serde_json::to_value(&nef).unwrap();
        value["checksum"] = json!(format!("0x{:08x}", nef.checksum));
        assert_eq!(serde_json::from_value::<NefFile>(value.clone()).unwrap(), nef);

        value["tokens"][0]["paramcount"] = json!(1);
        assert!(serde_json::from_value::<NefFile>(value).is_err());
    }
}
