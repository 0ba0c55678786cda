//! Bring untyped trees into the shape a descriptor expects.
//!
//! Coercion converts scalars between compatible kinds (numbers and booleans
//! into text, numeric or boolean text into numbers and booleans) and map keys
//! into the key type. Completion additionally replaces `null` on non-optional
//! members with the member's zero tree, inserts missing record members, and
//! pads short fixed-length arrays.

use serde_yaml::{Number, Value};

use crate::descriptor::{Shape, TypeDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Coerce,
    Complete,
}

/// Coerce scalars and map keys without filling gaps.
pub(crate) fn coerce(value: &mut Value, descriptor: &TypeDescriptor) {
    conform(value, descriptor, Mode::Coerce);
}

/// Coerce and fill every gap with zero trees.
pub(crate) fn complete(value: &mut Value, descriptor: &TypeDescriptor) {
    conform(value, descriptor, Mode::Complete);
}

fn conform(value: &mut Value, descriptor: &TypeDescriptor, mode: Mode) {
    if let Shape::Optional(inner) = descriptor.shape() {
        if !value.is_null() {
            conform(value, inner, mode);
        }
        return;
    }
    if value.is_null() {
        if mode == Mode::Complete {
            *value = descriptor.zero();
        }
        return;
    }
    match descriptor.shape() {
        Shape::String(_) => stringify(value),
        Shape::Integer => parse_integer(value),
        Shape::Number => parse_number(value),
        Shape::Boolean => parse_boolean(value),
        Shape::Array { items, len } => conform_sequence(value, items, *len, mode),
        Shape::Map { keys, values } => conform_map(value, keys, values, mode),
        Shape::Record(fields) => {
            let Value::Mapping(map) = value else {
                return;
            };
            for field in fields {
                if field.is_inline() {
                    let mut spliced = Value::Mapping(std::mem::take(map));
                    conform(&mut spliced, field.ty(), mode);
                    if let Value::Mapping(members) = spliced {
                        *map = members;
                    }
                    continue;
                }
                match map.get_mut(field.name()) {
                    Some(member) => conform(member, field.ty(), mode),
                    None if mode == Mode::Complete => {
                        map.insert(Value::from(field.name()), field.ty().zero());
                    }
                    None => {}
                }
            }
        }
        Shape::Optional(_) | Shape::Dynamic => {}
    }
}

fn conform_sequence(value: &mut Value, items: &TypeDescriptor, len: Option<usize>, mode: Mode) {
    let Value::Sequence(elements) = value else {
        return;
    };
    for element in elements.iter_mut() {
        conform(element, items, mode);
    }
    if mode == Mode::Complete
        && let Some(expected) = len
    {
        while elements.len() < expected {
            elements.push(items.zero());
        }
    }
}

fn conform_map(value: &mut Value, keys: &TypeDescriptor, values: &TypeDescriptor, mode: Mode) {
    let Value::Mapping(map) = value else {
        return;
    };
    let entries = std::mem::take(map);
    for (mut key, mut member) in entries {
        conform(&mut key, keys, Mode::Coerce);
        conform(&mut member, values, mode);
        map.insert(key, member);
    }
}

fn stringify(value: &mut Value) {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return,
    };
    *value = Value::String(text);
}

fn parse_integer(value: &mut Value) {
    let Value::String(text) = value else {
        return;
    };
    let trimmed = text.trim();
    let number = trimmed
        .parse::<u64>()
        .map(Number::from)
        .or_else(|_| trimmed.parse::<i64>().map(Number::from));
    if let Ok(parsed) = number {
        *value = Value::Number(parsed);
    }
}

fn parse_number(value: &mut Value) {
    let Value::String(text) = value else {
        return;
    };
    let trimmed = text.trim();
    let number = trimmed
        .parse::<u64>()
        .map(Number::from)
        .or_else(|_| trimmed.parse::<i64>().map(Number::from))
        .or_else(|_| trimmed.parse::<f64>().map(Number::from));
    if let Ok(parsed) = number {
        *value = Value::Number(parsed);
    }
}

fn parse_boolean(value: &mut Value) {
    let Value::String(text) = value else {
        return;
    };
    if let Some(flag) = boolean_literal(text.trim()) {
        *value = Value::Bool(flag);
    }
}

/// The YAML 1.2 core-schema spellings of a boolean.
pub(crate) fn boolean_literal(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
