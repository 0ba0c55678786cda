//! Scalar type inference for property-sourced trees.

use serde_yaml::{Number, Value};

use super::conform::boolean_literal;

/// Replace textual leaves with the scalar they spell.
///
/// Booleans are recognised first, then unsigned integers, signed integers,
/// and finite floats; anything else stays text. Map keys are inferred too, so
/// a property path segment `"1"` can address an integer-keyed map.
///
/// ```
/// use serde_yaml::Value;
/// use stratum_config::merge::infer_scalars;
///
/// assert_eq!(infer_scalars(Value::from("TRUE")), Value::Bool(true));
/// assert_eq!(infer_scalars(Value::from("-7")), Value::from(-7));
/// assert_eq!(infer_scalars(Value::from("+1.5")), Value::from("+1.5"));
/// assert_eq!(infer_scalars(Value::from("10m")), Value::from("10m"));
/// ```
#[must_use]
pub fn infer_scalars(value: Value) -> Value {
    match value {
        Value::String(text) => infer_text(text),
        Value::Sequence(elements) => {
            Value::Sequence(elements.into_iter().map(infer_scalars).collect())
        }
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, member)| (infer_scalars(key), infer_scalars(member)))
                .collect(),
        ),
        other => other,
    }
}

fn infer_text(text: String) -> Value {
    if let Some(flag) = boolean_literal(&text) {
        return Value::Bool(flag);
    }
    let signed = text.starts_with(['+', '-']);
    if !signed && let Ok(unsigned) = text.parse::<u64>() {
        return Value::Number(Number::from(unsigned));
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Value::Number(Number::from(integer));
    }
    if !text.starts_with('+')
        && let Ok(float) = text.parse::<f64>()
        && float.is_finite()
    {
        return Value::Number(Number::from(float));
    }
    Value::String(text)
}
