//! Constraint keywords that field annotations may set.
//!
//! Each [`KeywordSpec`] names the schema keyword, the annotation keys that set
//! it, where it lands, and how its annotation text is decoded.

use serde_yaml::Value;

use super::{AdditionalProperties, LiteralError, Schema};
use crate::descriptor::{Shape, TypeDescriptor};

/// Schema keywords settable from annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Keyword {
    /// `enum`
    Enum,
    /// `examples`
    Examples,
    /// `pattern`
    Pattern,
    /// `format`
    Format,
    /// `minimum`
    Minimum,
    /// `exclusiveMinimum`
    ExclusiveMinimum,
    /// `maximum`
    Maximum,
    /// `exclusiveMaximum`
    ExclusiveMaximum,
    /// `multipleOf`
    MultipleOf,
    /// `minLength`
    MinLength,
    /// `maxLength`
    MaxLength,
    /// `description`
    Description,
    /// `default`
    Default,
    /// `minItems`
    MinItems,
    /// `maxItems`
    MaxItems,
    /// `uniqueItems`
    UniqueItems,
    /// `minProperties`
    MinProperties,
    /// `maxProperties`
    MaxProperties,
}

/// Which node of a container a keyword applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The element node of an array or the value node of a map; the node
    /// itself otherwise.
    Inner,
    /// The node the annotation is declared on.
    Outer,
}

/// Whether the annotation text holds one value or a comma-separated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// One value.
    Single,
    /// A list, read as if wrapped in `[` and `]`.
    List,
}

/// How the annotation text is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// As a value of the type the keyword lands on.
    Element,
    /// Verbatim text.
    Text,
    /// A non-negative integer.
    Count,
    /// A boolean.
    Flag,
}

/// One row of the keyword table.
#[derive(Clone, Copy, Debug)]
pub struct KeywordSpec {
    /// Keyword set by the row.
    pub keyword: Keyword,
    /// Annotation keys that set the keyword, in precedence order.
    pub aliases: &'static [&'static str],
    /// Target node.
    pub placement: Placement,
    /// Single value or list.
    pub arity: Arity,
    /// Decoding of the annotation text.
    pub value_type: ValueType,
}

const fn row(
    keyword: Keyword,
    aliases: &'static [&'static str],
    placement: Placement,
    arity: Arity,
    value_type: ValueType,
) -> KeywordSpec {
    KeywordSpec {
        keyword,
        aliases,
        placement,
        arity,
        value_type,
    }
}

/// Every settable keyword, in application order.
pub static KEYWORDS: [KeywordSpec; 18] = {
    use Arity::{List, Single};
    use Placement::{Inner, Outer};
    use ValueType::{Count, Element, Flag, Text};
    [
        row(Keyword::Enum, &["enum"], Inner, List, Element),
        row(Keyword::Examples, &["examples"], Inner, List, Element),
        row(Keyword::Pattern, &["pattern"], Inner, Single, Text),
        row(Keyword::Format, &["format", "fmt"], Inner, Single, Text),
        row(Keyword::Minimum, &["minimum", "min"], Inner, Single, Element),
        row(Keyword::ExclusiveMinimum, &["exclusiveMinimum", "xmin"], Inner, Single, Element),
        row(Keyword::Maximum, &["maximum", "max"], Inner, Single, Element),
        row(Keyword::ExclusiveMaximum, &["exclusiveMaximum", "xmax"], Inner, Single, Element),
        row(Keyword::MultipleOf, &["multipleOf", "mul"], Inner, Single, Element),
        row(Keyword::MinLength, &["minLength", "minlen"], Inner, Single, Count),
        row(Keyword::MaxLength, &["maxLength", "maxlen"], Inner, Single, Count),
        row(Keyword::Description, &["description", "desc", "doc"], Outer, Single, Text),
        row(Keyword::Default, &["default", "def"], Outer, Single, Element),
        row(Keyword::MinItems, &["minItems", "minsize"], Outer, Single, Count),
        row(Keyword::MaxItems, &["maxItems", "maxsize"], Outer, Single, Count),
        row(Keyword::UniqueItems, &["uniqueItems", "unique"], Outer, Single, Flag),
        row(Keyword::MinProperties, &["minProperties", "minprops"], Outer, Single, Count),
        row(Keyword::MaxProperties, &["maxProperties", "maxprops"], Outer, Single, Count),
    ]
};

impl Keyword {
    /// Name of the keyword as it appears in serialized schemas.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Examples => "examples",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::Minimum => "minimum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::MultipleOf => "multipleOf",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Description => "description",
            Self::Default => "default",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::MinProperties => "minProperties",
            Self::MaxProperties => "maxProperties",
        }
    }
}

/// A decoded annotation value ready to be stored on a schema node.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// A typed value.
    Value(Value),
    /// Verbatim text.
    Text(String),
    /// A non-negative integer.
    Count(u64),
    /// A boolean.
    Flag(bool),
}

impl KeywordSpec {
    /// Decode annotation `text` for this keyword.
    ///
    /// `element` describes the value the keyword constrains and is consulted
    /// for [`ValueType::Element`] keywords only.
    ///
    /// # Errors
    ///
    /// Returns a [`LiteralError`] when the text is not valid YAML or does not
    /// fit the expected type.
    pub fn decode(&self, text: &str, element: &TypeDescriptor) -> Result<Literal, LiteralError> {
        match self.value_type {
            ValueType::Text => Ok(Literal::Text(text.to_owned())),
            ValueType::Count => serde_yaml::from_str(text)
                .map(Literal::Count)
                .map_err(LiteralError::Syntax),
            ValueType::Flag => serde_yaml::from_str(text)
                .map(Literal::Flag)
                .map_err(LiteralError::Syntax),
            ValueType::Element => match self.arity {
                Arity::Single => {
                    let raw: Value = serde_yaml::from_str(text).map_err(LiteralError::Syntax)?;
                    element.normalize(raw).map(Literal::Value)
                }
                Arity::List => {
                    let raw: Value =
                        serde_yaml::from_str(&format!("[{text}]")).map_err(LiteralError::Syntax)?;
                    let Value::Sequence(entries) = raw else {
                        return Err(LiteralError::NotSequence);
                    };
                    entries
                        .into_iter()
                        .map(|entry| element.normalize(entry))
                        .collect::<Result<Vec<_>, _>>()
                        .map(|values| Literal::Value(Value::Sequence(values)))
                }
            },
        }
    }

    /// The descriptor an element-typed literal is decoded with.
    #[must_use]
    pub fn element_type<'a>(&self, descriptor: &'a TypeDescriptor) -> &'a TypeDescriptor {
        let node = descriptor.dereferenced();
        match (self.placement, node.shape()) {
            (Placement::Inner, Shape::Array { items, .. }) => items.dereferenced(),
            (Placement::Inner, Shape::Map { values, .. }) => values.dereferenced(),
            _ => node,
        }
    }

    /// The node of `schema` this keyword lands on.
    #[must_use]
    pub fn target<'a>(&self, schema: &'a mut Schema) -> &'a mut Schema {
        if self.placement == Placement::Outer {
            return schema;
        }
        match schema {
            Schema {
                items: Some(items), ..
            } => &mut **items,
            Schema {
                additional_properties: Some(AdditionalProperties::Schema(values)),
                ..
            } => &mut **values,
            node => node,
        }
    }
}

impl Schema {
    /// Store `literal` under `keyword`.
    pub fn assign(&mut self, keyword: Keyword, literal: Literal) {
        match (keyword, literal) {
            (Keyword::Enum, Literal::Value(value)) => self.enumeration = Some(value),
            (Keyword::Examples, Literal::Value(value)) => self.examples = Some(value),
            (Keyword::Pattern, Literal::Text(text)) => self.pattern = Some(text),
            (Keyword::Format, Literal::Text(text)) => self.format = Some(text),
            (Keyword::Minimum, Literal::Value(value)) => self.minimum = Some(value),
            (Keyword::ExclusiveMinimum, Literal::Value(value)) => {
                self.exclusive_minimum = Some(value);
            }
            (Keyword::Maximum, Literal::Value(value)) => self.maximum = Some(value),
            (Keyword::ExclusiveMaximum, Literal::Value(value)) => {
                self.exclusive_maximum = Some(value);
            }
            (Keyword::MultipleOf, Literal::Value(value)) => self.multiple_of = Some(value),
            (Keyword::MinLength, Literal::Count(count)) => self.min_length = Some(count),
            (Keyword::MaxLength, Literal::Count(count)) => self.max_length = Some(count),
            (Keyword::Description, Literal::Text(text)) => self.description = Some(text),
            (Keyword::Default, Literal::Value(value)) => self.default = Some(value),
            (Keyword::MinItems, Literal::Count(count)) => self.min_items = Some(count),
            (Keyword::MaxItems, Literal::Count(count)) => self.max_items = Some(count),
            (Keyword::UniqueItems, Literal::Flag(flag)) => self.unique_items = flag,
            (Keyword::MinProperties, Literal::Count(count)) => self.min_properties = Some(count),
            (Keyword::MaxProperties, Literal::Count(count)) => self.max_properties = Some(count),
            (other, literal) => {
                tracing::warn!(keyword = other.name(), ?literal, "ignoring mismatched literal");
            }
        }
    }
}
