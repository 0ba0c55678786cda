//! Generates the schema of a representative configuration type and compares
//! it node by node with the expected tree.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use stratum_config::{
    Configurable,
    schema::{AdditionalProperties, Kind, Schema, generate},
};

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
struct Inner {
    string: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
struct Tagged {
    #[stratum_config(enum = "test1,test2")]
    strings: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
struct Sample {
    #[stratum_config(examples = "1,2,3")]
    float: f64,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
struct Counter {
    #[stratum_config(default = "10")]
    integer: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
#[serde(rename_all = "camelCase")]
struct Embedded {
    #[stratum_config(minlen = "10", maxlen = "20")]
    embedded_string: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Configurable)]
struct Everything {
    #[stratum_config(doc = "Test string")]
    string: String,
    #[serde(default)]
    float: f64,
    #[serde(default)]
    integer: i64,
    #[serde(default)]
    slice: Vec<Tagged>,
    array: [Sample; 2],
    #[serde(default)]
    map: HashMap<String, Counter>,
    #[serde(default)]
    #[stratum_config(default = "{string: 123}")]
    r#struct: Inner,
    #[serde(flatten)]
    embedded: Embedded,
}

fn record(properties: Vec<(&str, Schema)>, required: &[&str]) -> Schema {
    Schema {
        properties: properties
            .into_iter()
            .map(|(name, schema)| (name.to_owned(), schema))
            .collect::<BTreeMap<_, _>>(),
        additional_properties: Some(AdditionalProperties::Allowed(false)),
        required: required.iter().map(|name| (*name).to_owned()).collect(),
        ..Schema::new(Kind::Object)
    }
}

fn array_of(items: Schema) -> Schema {
    Schema {
        items: Some(Box::new(items)),
        ..Schema::new(Kind::Array)
    }
}

fn expected() -> Result<Schema> {
    let string = Schema::new(Kind::String);
    let tagged = record(
        vec![(
            "strings",
            array_of(Schema {
                enumeration: Some(serde_yaml::from_str("[test1, test2]")?),
                ..string.clone()
            }),
        )],
        &["strings"],
    );
    let sample = record(
        vec![(
            "float",
            Schema {
                examples: Some(serde_yaml::from_str("[1.0, 2.0, 3.0]")?),
                ..Schema::new(Kind::Number)
            },
        )],
        &["float"],
    );
    let counter = record(
        vec![(
            "integer",
            Schema {
                default: Some(Value::from(10)),
                ..Schema::new(Kind::Integer)
            },
        )],
        &["integer"],
    );
    let inner = Schema {
        default: Some(serde_yaml::from_str("{string: '123'}")?),
        ..record(vec![("string", string.clone())], &["string"])
    };

    Ok(record(
        vec![
            (
                "string",
                Schema {
                    description: Some("Test string".to_owned()),
                    ..string.clone()
                },
            ),
            ("float", Schema::new(Kind::Number)),
            ("integer", Schema::new(Kind::Integer)),
            ("slice", array_of(tagged)),
            (
                "array",
                Schema {
                    min_items: Some(2),
                    max_items: Some(2),
                    ..array_of(sample)
                },
            ),
            (
                "map",
                Schema {
                    additional_properties: Some(AdditionalProperties::Schema(Box::new(counter))),
                    ..Schema::new(Kind::Object)
                },
            ),
            ("struct", inner),
            (
                "embeddedString",
                Schema {
                    min_length: Some(10),
                    max_length: Some(20),
                    ..string
                },
            ),
        ],
        &["string", "array", "embeddedString"],
    ))
}

#[test]
fn generates_the_expected_tree() -> Result<()> {
    let actual = generate::<Everything>()?;
    let wanted = expected()?;
    for (name, schema) in &wanted.properties {
        ensure!(
            actual.properties.get(name) == Some(schema),
            "property {name} differs: {:#?}",
            actual.properties.get(name)
        );
    }
    ensure!(actual == wanted, "schema differs: {actual:#?}");
    Ok(())
}

#[test]
fn renders_as_json_schema() -> Result<()> {
    let json = serde_json::to_value(generate::<Everything>()?)?;
    let at = |pointer: &str| json.pointer(pointer).cloned();
    ensure!(at("/properties/map/additionalProperties/required") == Some(serde_json::json!(["integer"])));
    ensure!(at("/properties/struct/default") == Some(serde_json::json!({"string": "123"})));
    ensure!(at("/required") == Some(serde_json::json!(["string", "array", "embeddedString"])));
    ensure!(at("/properties/array/minItems") == Some(serde_json::json!(2)));
    Ok(())
}
