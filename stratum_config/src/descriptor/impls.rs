//! [`Configurable`] implementations for standard library and ecosystem types.

use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::Value;

use super::{Configurable, Shape, StringHints, TypeDescriptor};
use crate::{
    defaults::{DefaultsError, Supplied, apply_supplied_defaults},
    schema::Schema,
};

macro_rules! zero_compared {
    ($shape:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Configurable for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::of::<Self>($shape)
                }

                fn is_unset(&self) -> bool {
                    *self == Self::default()
                }
            }
        )+
    };
}

zero_compared!(Shape::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
zero_compared!(Shape::Boolean => bool);
zero_compared!(Shape::String(StringHints::default()) => char);
zero_compared!(Shape::String(StringHints::format("date-time")) => DateTime<Utc>);

macro_rules! floats {
    ($($ty:ty),+) => {
        $(
            impl Configurable for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::of::<Self>(Shape::Number)
                }

                fn is_unset(&self) -> bool {
                    *self == 0.0
                }
            }
        )+
    };
}

floats!(f32, f64);

impl Configurable for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::String(StringHints::default()))
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl Configurable for PathBuf {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::String(StringHints::default()))
    }

    fn is_unset(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl Configurable for serde_json::Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::Dynamic)
    }

    fn is_unset(&self) -> bool {
        self.is_null()
    }
}

impl<T: Configurable> Configurable for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::Optional(Box::new(T::descriptor())))
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn fill_defaults(&mut self, schema: &Schema, supplied: Supplied<'_>) -> Result<(), DefaultsError> {
        self.as_mut()
            .map_or(Ok(()), |inner| inner.fill_defaults(schema, supplied))
    }
}

impl<T: Configurable> Configurable for Box<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(T::descriptor().shape().clone())
    }

    fn is_unset(&self) -> bool {
        T::is_unset(self)
    }

    fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
        T::is_unset_in(self, supplied)
    }

    fn is_nil(&self) -> bool {
        T::is_nil(self)
    }

    fn fill_defaults(&mut self, schema: &Schema, supplied: Supplied<'_>) -> Result<(), DefaultsError> {
        T::fill_defaults(self, schema, supplied)
    }
}

/// A growable collection is unset when empty, unless a source supplied it.
fn collection_unset(is_empty: bool, supplied: Supplied<'_>) -> bool {
    is_empty && supplied.is_present() != Some(true)
}

fn fill_elements<'a, T, I>(
    elements: I,
    schema: &Schema,
    supplied: Supplied<'_>,
) -> Result<(), DefaultsError>
where
    T: Configurable + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let items = schema.items.as_deref().ok_or(DefaultsError::MissingItems)?;
    for (index, element) in elements.into_iter().enumerate() {
        apply_supplied_defaults(element, items, supplied.element(index))
            .map_err(|err| err.within(&index.to_string()))?;
    }
    Ok(())
}

impl<T: Configurable> Configurable for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::Array {
            items: Box::new(T::descriptor()),
            len: None,
        })
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
        collection_unset(self.is_empty(), supplied)
    }

    fn fill_defaults(&mut self, schema: &Schema, supplied: Supplied<'_>) -> Result<(), DefaultsError> {
        fill_elements(self.iter_mut(), schema, supplied)
    }
}

macro_rules! fixed_arrays {
    ($($len:literal)+) => {
        $(
            impl<T: Configurable> Configurable for [T; $len] {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::of::<Self>(Shape::Array {
                        items: Box::new(T::descriptor()),
                        len: Some($len),
                    })
                }

                fn is_unset(&self) -> bool {
                    self.iter().all(Configurable::is_unset)
                }

                fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
                    self.iter()
                        .enumerate()
                        .all(|(index, element)| element.is_unset_in(supplied.element(index)))
                }

                fn fill_defaults(
                    &mut self,
                    schema: &Schema,
                    supplied: Supplied<'_>,
                ) -> Result<(), DefaultsError> {
                    fill_elements(self.iter_mut(), schema, supplied)
                }
            }
        )+
    };
}

fixed_arrays!(
    0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
    17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
);

/// Readable label for a map key in error paths.
fn key_label(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_owned())
            .unwrap_or_default(),
    }
}

fn fill_entries<'a, K, V, I>(
    entries: I,
    schema: &Schema,
    supplied: Supplied<'_>,
) -> Result<(), DefaultsError>
where
    K: Serialize + 'a,
    V: Configurable + 'a,
    I: IntoIterator<Item = (&'a K, &'a mut V)>,
{
    let values = schema
        .additional_schema()
        .ok_or(DefaultsError::MissingValues)?;
    for (key, value) in entries {
        if value.is_nil() {
            continue;
        }
        let serialized = serde_yaml::to_value(key).unwrap_or(Value::Null);
        apply_supplied_defaults(value, values, supplied.entry(&serialized))
            .map_err(|err| err.within(&key_label(&serialized)))?;
    }
    Ok(())
}

impl<K, V, S> Configurable for HashMap<K, V, S>
where
    K: Configurable + Eq + Hash,
    V: Configurable,
    S: BuildHasher + Default,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::Map {
            keys: Box::new(K::descriptor()),
            values: Box::new(V::descriptor()),
        })
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
        collection_unset(self.is_empty(), supplied)
    }

    fn fill_defaults(&mut self, schema: &Schema, supplied: Supplied<'_>) -> Result<(), DefaultsError> {
        fill_entries(self.iter_mut(), schema, supplied)
    }
}

impl<K, V> Configurable for BTreeMap<K, V>
where
    K: Configurable + Ord,
    V: Configurable,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::Map {
            keys: Box::new(K::descriptor()),
            values: Box::new(V::descriptor()),
        })
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn is_unset_in(&self, supplied: Supplied<'_>) -> bool {
        collection_unset(self.is_empty(), supplied)
    }

    fn fill_defaults(&mut self, schema: &Schema, supplied: Supplied<'_>) -> Result<(), DefaultsError> {
        fill_entries(self.iter_mut(), schema, supplied)
    }
}
