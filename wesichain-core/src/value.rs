use serde::{de::DeserializeOwned, Serialize};

use crate::WesichainError;

pub type Value = serde_json::Value;

pub trait IntoValue {
    fn into_value(self) -> Result<Value, WesichainError>;
}

pub trait TryFromValue: Sized {
    fn try_from_value(value: Value) -> Result<Self, WesichainError>;
}

impl<T> IntoValue for T
where
    T: Serialize,
{
    fn into_value(self) -> Result<Value, WesichainError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T> TryFromValue for T
where
    T: DeserializeOwned,
{
    fn try_from_value(value: Value) -> Result<Self, WesichainError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Human-readable JSON type name, used in type-mismatch diagnostics.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
