//! Schema generation from type descriptors.

use std::collections::BTreeMap;

use super::{AdditionalProperties, Kind, Schema, SchemaError, keywords::KEYWORDS};
use crate::descriptor::{Annotations, Configurable, FieldDescriptor, Shape, TypeDescriptor};

/// Generate the schema describing `T`.
///
/// # Errors
///
/// Returns a [`SchemaError`] when a member's shape cannot be classified, an
/// inline member is not a record, or an annotation cannot be decoded.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stratum_config::{Configurable, schema::{Kind, generate}};
///
/// #[derive(Default, Deserialize, Serialize, Configurable)]
/// struct Server {
///     #[stratum_config(default = "8080", min = "1")]
///     port: u16,
/// }
///
/// let schema = generate::<Server>()?;
/// assert_eq!(schema.kind, Kind::Object);
/// assert_eq!(schema.required, ["port"]);
/// let port = schema.property("port").expect("port is described");
/// assert_eq!(port.default, Some(serde_yaml::Value::from(8080)));
/// # Ok::<_, stratum_config::SchemaError>(())
/// ```
pub fn generate<T: Configurable>() -> Result<Schema, SchemaError> {
    generate_descriptor(&T::descriptor(), &Annotations::default())
}

/// Generate the schema for `descriptor`, applying `annotations` to the node.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_descriptor(
    descriptor: &TypeDescriptor,
    annotations: &Annotations,
) -> Result<Schema, SchemaError> {
    let mut schema = match descriptor.shape() {
        Shape::Optional(inner) => return generate_descriptor(inner, annotations),
        Shape::String(hints) => Schema {
            format: hints.format.clone(),
            pattern: hints.pattern.clone(),
            ..Schema::new(Kind::String)
        },
        Shape::Integer => Schema::new(Kind::Integer),
        Shape::Number => Schema::new(Kind::Number),
        Shape::Boolean => Schema::new(Kind::Boolean),
        Shape::Array { items, len } => {
            let element = generate_descriptor(items, &Annotations::default())
                .map_err(|err| err.within("items"))?;
            let fixed = len.map(|count| u64::try_from(count).unwrap_or(u64::MAX));
            Schema {
                items: Some(Box::new(element)),
                min_items: fixed,
                max_items: fixed,
                ..Schema::new(Kind::Array)
            }
        }
        Shape::Map { values, .. } => {
            let value = generate_descriptor(values, &Annotations::default())
                .map_err(|err| err.within("additionalProperties"))?;
            Schema {
                additional_properties: Some(AdditionalProperties::Schema(Box::new(value))),
                ..Schema::new(Kind::Object)
            }
        }
        Shape::Record(fields) => record_schema(fields)?,
        Shape::Dynamic => {
            return Err(SchemaError::Unclassified {
                type_name: descriptor.type_name(),
            });
        }
    };
    apply_annotations(&mut schema, annotations, descriptor)?;
    Ok(schema)
}

fn record_schema(fields: &[FieldDescriptor]) -> Result<Schema, SchemaError> {
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    for field in fields {
        let name = field.name();
        if field.is_inline() {
            let embedded = generate_descriptor(field.ty(), &Annotations::default())
                .map_err(|err| err.within(name))?;
            if !embedded.is_record() {
                return Err(SchemaError::InlineShape {
                    type_name: field.ty().type_name(),
                }
                .within(name));
            }
            required.extend(embedded.required);
            properties.extend(embedded.properties);
            continue;
        }

        let property =
            generate_descriptor(field.ty(), field.annotations()).map_err(|err| err.within(name))?;
        if !field.is_optional() {
            required.push(name.to_owned());
        }
        properties.insert(name.to_owned(), property);
    }

    Ok(Schema {
        properties,
        additional_properties: Some(AdditionalProperties::Allowed(false)),
        required,
        ..Schema::new(Kind::Object)
    })
}

fn apply_annotations(
    schema: &mut Schema,
    annotations: &Annotations,
    descriptor: &TypeDescriptor,
) -> Result<(), SchemaError> {
    if annotations.is_empty() {
        return Ok(());
    }
    for spec in &KEYWORDS {
        let Some((alias, text)) = annotations.find(spec.aliases) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        let literal = spec
            .decode(text, spec.element_type(descriptor))
            .map_err(|source| SchemaError::Literal {
                keyword: spec.keyword.name(),
                alias: alias.to_owned(),
                text: text.to_owned(),
                source,
            })?;
        tracing::trace!(keyword = spec.keyword.name(), alias, "applied schema annotation");
        spec.target(schema).assign(spec.keyword, literal);
    }
    Ok(())
}
