use serde::{Deserialize, Serialize};
use serde_json::json;
use wesichain_core::{value_type_name, IntoValue, TryFromValue, Value};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Demo {
    name: String,
}

#[test]
fn value_roundtrip_for_struct() {
    let input = Demo {
        name: "alpha".to_string(),
    };
    let value: Value = input.into_value().expect("serialize");
    let output = Demo::try_from_value(value).expect("convert back");
    assert_eq!(
        output,
        Demo {
            name: "alpha".to_string(),
        }
    );
}

#[test]
fn value_type_names_cover_json_kinds() {
    assert_eq!(value_type_name(&json!(null)), "null");
    assert_eq!(value_type_name(&json!(true)), "boolean");
    assert_eq!(value_type_name(&json!(1.5)), "number");
    assert_eq!(value_type_name(&json!("s")), "string");
    assert_eq!(value_type_name(&json!([])), "array");
    assert_eq!(value_type_name(&json!({})), "object");
}
