//! Codecs backed by serde format crates.

use std::io::{Read, Write};

use serde_yaml::Value;

use super::{Codec, CodecError, read_all};
#[cfg(any(feature = "toml", feature = "json5"))]
use super::read_text;

/// JSON via `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        serde_json::to_writer_pretty(&mut *out, value).map_err(|err| CodecError::encode("json", err))?;
        out.write_all(b"\n").map_err(CodecError::Write)
    }

    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let bytes = read_all(input)?;
        serde_json::from_slice(&bytes).map_err(|err| CodecError::decode("json", err))
    }
}

/// YAML via `serde_yaml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        serde_yaml::to_writer(out, value).map_err(|err| CodecError::encode("yaml", err))
    }

    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let bytes = read_all(input)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_yaml::from_slice(&bytes).map_err(|err| CodecError::decode("yaml", err))
    }
}

/// Drop `null` members, which formats such as TOML cannot represent.
#[cfg(feature = "toml")]
pub(crate) fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .filter(|(_, member)| !member.is_null())
                .map(|(key, member)| (key.clone(), without_nulls(member)))
                .collect(),
        ),
        Value::Sequence(elements) => Value::Sequence(
            elements
                .iter()
                .filter(|element| !element.is_null())
                .map(without_nulls)
                .collect(),
        ),
        other => other.clone(),
    }
}

/// TOML via the `toml` crate.
#[cfg(feature = "toml")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlCodec;

#[cfg(feature = "toml")]
impl Codec for TomlCodec {
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        let text = toml::to_string_pretty(&without_nulls(value))
            .map_err(|err| CodecError::encode("toml", err))?;
        out.write_all(text.as_bytes()).map_err(CodecError::Write)
    }

    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let text = read_text(input, "toml")?;
        toml::from_str(&text).map_err(|err| CodecError::decode("toml", err))
    }
}

/// JSON5 via the `json5` crate.
#[cfg(feature = "json5")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Json5Codec;

#[cfg(feature = "json5")]
impl Codec for Json5Codec {
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        let text = json5::to_string(value).map_err(|err| CodecError::encode("json5", err))?;
        out.write_all(text.as_bytes()).map_err(CodecError::Write)?;
        out.write_all(b"\n").map_err(CodecError::Write)
    }

    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let text = read_text(input, "json5")?;
        json5::from_str(&text).map_err(|err| CodecError::decode("json5", err))
    }
}
