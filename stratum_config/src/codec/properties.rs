//! Java-style `key.path=value` documents.

use std::io::{Read, Write};

use serde_yaml::Value;

use super::{Codec, CodecError, read_text};
use crate::source::{PropertyEntry, tree};

const FORMAT: &str = "properties";

/// Line-based `key.path=value` documents.
///
/// Decoding skips blank lines and lines starting with `#` or `!`, splits each
/// remaining line at the first `=` or `:`, and builds the tree spelled by the
/// dotted keys. Leaves stay textual; the merger coerces them to the target
/// types. Encoding flattens a tree back into lines in document order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertiesCodec;

impl Codec for PropertiesCodec {
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError> {
        let mut lines = Vec::new();
        flatten(value, &mut Vec::new(), &mut lines);
        for (key, text) in lines {
            writeln!(out, "{key}={text}").map_err(CodecError::Write)?;
        }
        Ok(())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError> {
        let text = read_text(input, FORMAT)?;
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(['#', '!']) {
                continue;
            }
            let (key, value) = line
                .split_once(['=', ':'])
                .map_or((line, ""), |(key, value)| (key.trim_end(), value.trim_start()));
            if key.is_empty() || key.split('.').any(str::is_empty) {
                return Err(CodecError::decode(
                    FORMAT,
                    format!("line {}: malformed key '{key}'", index.saturating_add(1)),
                ));
            }
            entries.push(PropertyEntry::new(key.split('.'), value));
        }
        Ok(tree::build(&entries))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn flatten(value: &Value, path: &mut Vec<String>, lines: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (key, member) in map {
                path.push(scalar_text(key).unwrap_or_default());
                flatten(member, path, lines);
                path.pop();
            }
        }
        Value::Sequence(elements) => {
            for (index, element) in elements.iter().enumerate() {
                path.push(index.to_string());
                flatten(element, path, lines);
                path.pop();
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                lines.push((path.join("."), text));
            }
        }
    }
}
