//! Runtime descriptions of configuration types.
//!
//! A [`TypeDescriptor`] tells the schema generator, the defaults applier, and
//! the document merger what a type looks like: whether it is a scalar, a
//! sequence, a map, or a record with named fields. Descriptors are produced by
//! [`Configurable::descriptor`], which the derive macro implements for records
//! and this module implements for the standard library types a configuration
//! is usually built from.

mod annotations;
mod duration;
mod impls;
mod pattern;


use serde::{Serialize, de::DeserializeOwned};
use serde_yaml::Value;

pub use annotations::Annotations;
pub use duration::{DURATION_PATTERN, Duration, ParseDurationError};
pub use pattern::{ParseRegexError, Regex};

use crate::{
    defaults::{DefaultsError, Supplied},
    merge::conform,
    schema::{LiteralError, Schema},
};

/// Types that can be loaded as configuration.
///
/// Implemented by `#[derive(Configurable)]` for records and by this crate for
/// scalars, strings, paths, timestamps, durations, regular expressions,
/// optionals, sequences,
/// fixed-length arrays, and maps.
pub trait Configurable: Serialize + DeserializeOwned + Default {
    /// Describe the shape of the type.
    fn descriptor() -> TypeDescriptor;

    /// Whether the value equals its zero value.
    ///
    /// Collections report `true` when empty. [`Configurable::is_unset_in`]
    /// refines this with what the sources supplied.
    fn is_unset(&self) -> bool;

    /// Whether the value is unset, given the document the sources `supplied`
    /// for it.
    ///
    /// Scalars ignore `supplied`. Collections are unset only when empty and
    /// not supplied; records when every described member is unset.
    fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
        let _ = supplied;
        self.is_unset()
    }

    /// Whether the value is an absent optional.
    fn is_nil(&self) -> bool {
        false
    }

    /// Recurse into nested values so that their own defaults are applied.
    ///
    /// `schema` is the schema node describing `self` and `supplied` the
    /// document the sources supplied for it. Scalars keep the default no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`DefaultsError`] when a nested default does not fit or the
    /// schema does not match the value's shape.
    fn fill_defaults(
        &mut self,
        _schema: &Schema,
        _supplied: Supplied<'_>,
    ) -> Result<(), DefaultsError> {
        Ok(())
    }
}

/// Describes one configuration type.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    type_name: &'static str,
    shape: Shape,
    normalize: fn(Value) -> Result<Value, LiteralError>,
    zero: fn() -> Value,
}

impl TypeDescriptor {
    /// Describe `T` with the given shape.
    #[must_use]
    pub fn of<T: Configurable>(shape: Shape) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shape,
            normalize: normalize_as::<T>,
            zero: zero_of::<T>,
        }
    }

    /// Describe the record `T` from its fields.
    #[must_use]
    pub fn record<T: Configurable>(fields: Vec<FieldDescriptor>) -> Self {
        Self::of::<T>(Shape::Record(fields))
    }

    /// The Rust type name, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The shape of the described type.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The descriptor with optional wrappers removed.
    #[must_use]
    pub fn dereferenced(&self) -> &Self {
        match &self.shape {
            Shape::Optional(inner) => inner.dereferenced(),
            _ => self,
        }
    }

    /// Decode `value` as the described type and re-encode it.
    ///
    /// The round trip validates the literal and brings it into the type's
    /// canonical form, so `"00042"` read for an integer becomes `42`.
    ///
    /// # Errors
    ///
    /// Returns a [`LiteralError`] when `value` does not fit the type.
    pub fn normalize(&self, value: Value) -> Result<Value, LiteralError> {
        (self.normalize)(value)
    }

    /// The serialized zero value of the described type.
    #[must_use]
    pub fn zero(&self) -> Value {
        (self.zero)()
    }
}

/// Structural classification of a configuration type.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Shape {
    /// Text, optionally carrying a format or pattern hint.
    String(StringHints),
    /// Whole numbers of any width.
    Integer,
    /// Floating-point numbers.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A nullable wrapper around another type.
    Optional(Box<TypeDescriptor>),
    /// A sequence; `len` is set for fixed-length arrays.
    Array {
        /// Element type.
        items: Box<TypeDescriptor>,
        /// Exact length of a fixed array.
        len: Option<usize>,
    },
    /// A keyed collection.
    Map {
        /// Key type.
        keys: Box<TypeDescriptor>,
        /// Value type.
        values: Box<TypeDescriptor>,
    },
    /// A record with named fields.
    Record(Vec<FieldDescriptor>),
    /// A value whose shape is only known at runtime.
    Dynamic,
}

/// Hints attached to string-shaped types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringHints {
    /// JSON-Schema `format` keyword, e.g. `date-time`.
    pub format: Option<String>,
    /// Regular expression the text must match.
    pub pattern: Option<String>,
}

impl StringHints {
    /// Hints carrying only a format.
    #[must_use]
    pub fn format(format: &str) -> Self {
        Self {
            format: Some(format.to_owned()),
            pattern: None,
        }
    }

    /// Hints carrying only a pattern.
    #[must_use]
    pub fn pattern(pattern: &str) -> Self {
        Self {
            format: None,
            pattern: Some(pattern.to_owned()),
        }
    }
}

/// One field of a record.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: String,
    annotations: Annotations,
    inline: bool,
    optional: bool,
    ty: TypeDescriptor,
}

impl FieldDescriptor {
    /// Describe a field called `name` holding a `T`.
    #[must_use]
    pub fn new<T: Configurable>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Annotations::default(),
            inline: false,
            optional: false,
            ty: T::descriptor(),
        }
    }

    /// Attach an annotation.
    #[must_use]
    pub fn annotate(mut self, key: &str, text: &str) -> Self {
        self.annotations.insert(key, text);
        self
    }

    /// Splice the field's record members into the enclosing record.
    #[must_use]
    pub const fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Leave the field out of the enclosing record's `required` list.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Serialized name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annotations attached to the field.
    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Whether the field is spliced into its parent.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether the field may be omitted.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Descriptor of the field's type.
    #[must_use]
    pub const fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }
}

fn normalize_as<T: Configurable>(mut value: Value) -> Result<Value, LiteralError> {
    conform::complete(&mut value, &T::descriptor());
    let typed: T = serde_yaml::from_value(value).map_err(LiteralError::Decode)?;
    serde_yaml::to_value(&typed).map_err(LiteralError::Encode)
}

fn zero_of<T: Configurable>() -> Value {
    serde_yaml::to_value(T::default()).unwrap_or(Value::Null)
}
