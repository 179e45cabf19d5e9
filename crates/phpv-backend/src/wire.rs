//! Lenient decoding for backend enum fields.
//!
//! The backend emits enums either as their numeric discriminant or as their
//! name, depending on the serializer settings it was built with. Values that
//! match neither form decode to `None` so one odd record never fails a whole
//! listing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub trait WireEnum: Sized {
    fn from_code(code: i64) -> Option<Self>;
    fn from_name(name: &str) -> Option<Self>;
}

pub(crate) fn decode<T: WireEnum>(value: &Value) -> Option<T> {
    match value {
        Value::Number(number) => number.as_i64().and_then(T::from_code),
        Value::String(name) => {
            let trimmed = name.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .and_then(T::from_code)
                .or_else(|| T::from_name(trimmed))
        }
        _ => None,
    }
}

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireEnum,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decode))
}

/// Accepts a string or a number and yields it as text; anything else is absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
