//! Unit tests for schema generation and keyword decoding.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::{AdditionalProperties, Kind, Schema, SchemaError, generate};
use crate::{Configurable, Duration};

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Limits {
    #[stratum_config(min = 1, xmax = "100", mul = 2, default = "10")]
    workers: u32,
    #[stratum_config(doc = "Short name", minlen = 1, maxlen = 8, pattern = "^[a-z]+$")]
    name: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Collections {
    #[stratum_config(enum = "1,2,3", minsize = 1, unique = true, default = "[1, 2]")]
    levels: Vec<u8>,
    #[stratum_config(max = 9, maxprops = 4)]
    weights: BTreeMap<String, u8>,
    pair: [bool; 2],
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Outer {
    first: String,
    #[serde(flatten)]
    limits: Limits,
    #[serde(default)]
    last: Option<Duration>,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct BadInline {
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Untyped {
    nested: Nested,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Nested {
    blob: serde_json::Value,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct BadDefault {
    #[stratum_config(default = "many")]
    count: u8,
}

fn property<'a>(schema: &'a Schema, name: &str) -> Result<&'a Schema> {
    schema
        .property(name)
        .ok_or_else(|| anyhow!("missing property {name}"))
}

#[rstest]
fn records_are_closed_objects_with_required_members() -> Result<()> {
    let schema = generate::<Limits>()?;
    ensure!(schema.kind == Kind::Object);
    ensure!(schema.is_record(), "records should be closed");
    ensure!(schema.required == ["workers", "name"], "required: {:?}", schema.required);
    Ok(())
}

#[rstest]
fn scalar_annotations_land_on_the_member() -> Result<()> {
    let schema = generate::<Limits>()?;
    let workers = property(&schema, "workers")?;
    ensure!(workers.kind == Kind::Integer);
    ensure!(workers.minimum == Some(Value::from(1)));
    ensure!(workers.exclusive_maximum == Some(Value::from(100)));
    ensure!(workers.multiple_of == Some(Value::from(2)));
    ensure!(workers.default == Some(Value::from(10)));

    let name = property(&schema, "name")?;
    ensure!(name.description.as_deref() == Some("Short name"));
    ensure!(name.min_length == Some(1) && name.max_length == Some(8));
    ensure!(name.pattern.as_deref() == Some("^[a-z]+$"));
    Ok(())
}

#[rstest]
fn inner_keywords_land_on_elements_and_values() -> Result<()> {
    let schema = generate::<Collections>()?;

    let levels = property(&schema, "levels")?;
    ensure!(levels.kind == Kind::Array);
    ensure!(levels.min_items == Some(1) && levels.unique_items);
    ensure!(levels.default == Some(serde_yaml::from_str("[1, 2]")?));
    ensure!(levels.enumeration.is_none(), "enum belongs to the items");
    let items = levels.items.as_deref().ok_or_else(|| anyhow!("missing items"))?;
    ensure!(items.enumeration == Some(serde_yaml::from_str("[1, 2, 3]")?));

    let weights = property(&schema, "weights")?;
    ensure!(weights.max_properties == Some(4));
    let values = weights
        .additional_schema()
        .ok_or_else(|| anyhow!("maps carry a value schema"))?;
    ensure!(values.maximum == Some(Value::from(9)));
    Ok(())
}

#[rstest]
fn fixed_arrays_pin_their_length() -> Result<()> {
    let schema = generate::<Collections>()?;
    let pair = property(&schema, "pair")?;
    ensure!(pair.min_items == Some(2) && pair.max_items == Some(2));
    Ok(())
}

#[rstest]
fn inline_members_are_spliced_into_the_parent() -> Result<()> {
    let schema = generate::<Outer>()?;
    let names: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
    ensure!(names == ["first", "last", "name", "workers"], "properties: {names:?}");
    ensure!(
        schema.required == ["first", "workers", "name"],
        "required: {:?}",
        schema.required
    );
    let last = property(&schema, "last")?;
    ensure!(last.kind == Kind::String && last.pattern.is_some());
    Ok(())
}

#[rstest]
fn inline_members_must_be_records() {
    let err = generate::<BadInline>().err();
    assert!(
        matches!(
            err,
            Some(SchemaError::Field { ref path, ref source })
                if path == "extra" && matches!(**source, SchemaError::InlineShape { .. })
        ),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn unclassified_members_report_their_path() {
    let err = generate::<Untyped>().err();
    assert!(
        matches!(
            err,
            Some(SchemaError::Field { ref path, ref source })
                if path == "nested.blob" && matches!(**source, SchemaError::Unclassified { .. })
        ),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn invalid_literals_name_keyword_and_alias() -> Result<()> {
    let Err(SchemaError::Field { source, .. }) = generate::<BadDefault>() else {
        return Err(anyhow!("expected a field error"));
    };
    let SchemaError::Literal { keyword, alias, text, .. } = *source else {
        return Err(anyhow!("expected a literal error"));
    };
    ensure!(keyword == "default" && alias == "default" && text == "many");
    Ok(())
}

#[rstest]
fn serializes_with_json_schema_keywords() -> Result<()> {
    let schema = generate::<Collections>()?;
    let json = serde_json::to_value(&schema)?;
    let at = |pointer: &str| json.pointer(pointer).cloned();
    ensure!(at("/type") == Some(serde_json::json!("object")));
    ensure!(at("/additionalProperties") == Some(serde_json::json!(false)));
    ensure!(at("/properties/levels/uniqueItems") == Some(serde_json::json!(true)));
    ensure!(at("/properties/levels/items/enum") == Some(serde_json::json!([1, 2, 3])));
    ensure!(at("/properties/weights/maxProperties") == Some(serde_json::json!(4)));
    ensure!(at("/properties/pair/uniqueItems").is_none());
    Ok(())
}

#[rstest]
fn parses_serialized_schemas_back() -> Result<()> {
    let schema = generate::<Outer>()?;
    let text = serde_json::to_string(&schema)?;
    let parsed: Schema = serde_json::from_str(&text)?;
    ensure!(parsed == schema);
    ensure!(matches!(
        parsed.additional_properties,
        Some(AdditionalProperties::Allowed(false))
    ));
    Ok(())
}
