//! Unit tests for the built-in codecs and the registry.

use anyhow::{Result, anyhow, ensure};
use camino::Utf8Path;
use rstest::rstest;
use serde_yaml::Value;

use super::{Codec, CodecError, Codecs, JsonCodec, PropertiesCodec, YamlCodec, format_for_path};

fn yaml(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

fn encode(codec: &dyn Codec, value: &Value) -> Result<String> {
    let mut out = Vec::new();
    codec.encode(value, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn decode(codec: &dyn Codec, text: &str) -> Result<Value> {
    Ok(codec.decode(&mut text.as_bytes())?)
}

#[rstest]
fn default_registry_lists_built_in_formats() {
    let codecs = Codecs::default();
    let formats: Vec<&str> = codecs.formats().collect();
    for format in ["json", "properties", "yaml"] {
        assert!(formats.contains(&format), "missing {format} in {formats:?}");
    }
    #[cfg(feature = "toml")]
    assert!(formats.contains(&"toml"));
    #[cfg(feature = "json5")]
    assert!(formats.contains(&"json5"));
}

#[rstest]
fn registered_codecs_replace_earlier_entries() -> Result<()> {
    let mut codecs = Codecs::empty();
    codecs.register("conf", JsonCodec).register("conf", YamlCodec);
    let codec = codecs.get("conf").ok_or_else(|| anyhow!("conf is registered"))?;
    ensure!(decode(codec, "a: 1")? == yaml("{a: 1}")?);
    ensure!(codecs.get("json").is_none());
    Ok(())
}

#[rstest]
#[case::yaml("app.yaml", Some("yaml"))]
#[case::yml("app.yml", Some("yaml"))]
#[case::upper("APP.JSON", Some("json"))]
#[case::toml("app.toml", Some("toml"))]
#[case::json5("app.json5", Some("json5"))]
#[case::properties("app.properties", Some("properties"))]
#[case::unknown("app.ini", None)]
#[case::bare("app", None)]
fn infers_formats_from_extensions(#[case] path: &str, #[case] expected: Option<&str>) {
    assert_eq!(format_for_path(Utf8Path::new(path)), expected);
}

#[rstest]
fn json_round_trips_nested_documents() -> Result<()> {
    let value = yaml("{server: {port: 80, hosts: [a, b]}, debug: true}")?;
    let text = encode(&JsonCodec, &value)?;
    ensure!(text.ends_with("}\n"), "json output ends with a newline: {text:?}");
    ensure!(decode(&JsonCodec, &text)? == value);
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::blank("  \n\t\n")]
fn blank_yaml_decodes_to_null(#[case] text: &str) -> Result<()> {
    ensure!(decode(&YamlCodec, text)?.is_null());
    Ok(())
}

#[rstest]
fn invalid_documents_report_their_format() {
    let err = JsonCodec.decode(&mut "{".as_bytes()).err();
    assert!(
        matches!(err, Some(CodecError::Decode { format: "json", .. })),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn properties_decode_dotted_keys() -> Result<()> {
    let text = "# comment\n! also a comment\n\nserver.port = 80\nserver.host: example\nname=a=b\nempty\n";
    let decoded = decode(&PropertiesCodec, text)?;
    ensure!(
        decoded == yaml("{server: {port: '80', host: example}, name: 'a=b', empty: ''}")?,
        "got {decoded:?}"
    );
    Ok(())
}

#[rstest]
fn properties_reject_empty_key_segments() {
    let err = PropertiesCodec
        .decode(&mut "ok=1\nserver..port=2\n".as_bytes())
        .err()
        .map(|err| err.to_string());
    assert!(
        err.as_deref().is_some_and(|text| text.contains("line 2")),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn properties_flatten_trees_in_document_order() -> Result<()> {
    let value = yaml("{server: {port: 80, tags: [a, b]}, debug: false, unset: null}")?;
    let text = encode(&PropertiesCodec, &value)?;
    ensure!(
        text == "server.port=80\nserver.tags.0=a\nserver.tags.1=b\ndebug=false\nunset=\n",
        "got {text:?}"
    );
    Ok(())
}

#[cfg(feature = "toml")]
#[rstest]
fn toml_skips_null_members() -> Result<()> {
    let value = yaml("{name: demo, missing: null, server: {port: 80}}")?;
    let text = encode(&super::TomlCodec, &value)?;
    ensure!(!text.contains("missing"), "null leaked into toml: {text}");
    ensure!(decode(&super::TomlCodec, &text)? == yaml("{name: demo, server: {port: 80}}")?);
    Ok(())
}

#[cfg(feature = "json5")]
#[rstest]
fn json5_accepts_relaxed_syntax() -> Result<()> {
    let decoded = decode(&super::Json5Codec, "{name: 'demo', // comment\n hosts: ['a',],}")?;
    ensure!(decoded == yaml("{name: demo, hosts: [a]}")?, "got {decoded:?}");
    Ok(())
}
