use super::ports::Payload;
use super::protocol::DECIMAL_FIELDS;
use serde_json::Value;

/// Concatenates the values of `field_names`, in that order, with no delimiter.
///
/// Absent fields contribute an empty string. Amount fields are rendered with
/// exactly two decimals; every other number uses its plain decimal form.
pub fn canonicalize(payload: &Payload, field_names: &[&str]) -> String {
    field_names
        .iter()
        .map(|name| render(name, payload.get(*name)))
        .collect()
}

fn render(name: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if DECIMAL_FIELDS.contains(&name) => match n.as_f64() {
            Some(v) => format!("{v:.2}"),
            None => n.to_string(),
        },
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_concatenates_in_given_order() {
        let fields = payload(json!({"a": "x", "b": 7, "c": "z"}));
        assert_eq!(canonicalize(&fields, &["c", "a", "b"]), "zx7");
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let fields = payload(json!({"a": "x", "b": null}));
        assert_eq!(canonicalize(&fields, &["missing", "a", "b", "other"]), "x");
    }

    #[test]
    fn test_amounts_render_two_decimals() {
        let fields = payload(json!({"monto": 1234.5, "iva": 16, "tipoPago": 1}));
        assert_eq!(canonicalize(&fields, &["monto", "iva", "tipoPago"]), "1234.5016.001");
        let fields = payload(json!({"monto": 0.1}));
        assert_eq!(canonicalize(&fields, &["monto"]), "0.10");
    }
}
