//! Defensive views over the loosely-typed JSON the API returns.
//!
//! Every accessor returns an `Option` or a placeholder rather than failing, so
//! a renderer can always produce output for whatever shape arrived.

use serde_json::{Map, Value};

/// Text shown for a display field that is absent or `null`.
pub const MISSING_PLACEHOLDER: &str = "-";

/// Top-level shape of an API response envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiResponse<'a> {
    /// `{"data": {...}}` single-entity response.
    Object(Record<'a>),
    /// `{"data": [...]}` list response.
    List(&'a [Value]),
    /// `data` missing, `null`, or of any other type.
    Unknown,
}

impl<'a> ApiResponse<'a> {
    /// Classify a decoded response body by the type of its `data` field.
    #[must_use]
    pub fn classify(body: &'a Value) -> Self {
        match body.get("data") {
            Some(Value::Object(fields)) => Self::Object(Record(fields)),
            Some(Value::Array(items)) => Self::List(items),
            _ => Self::Unknown,
        }
    }

    /// The entity of a single-object response.
    #[must_use]
    pub const fn object(self) -> Option<Record<'a>> {
        match self {
            Self::Object(record) => Some(record),
            Self::List(_) | Self::Unknown => None,
        }
    }

    /// Items of a list response, `None` when the list is absent or empty.
    #[must_use]
    pub fn non_empty_list(self) -> Option<&'a [Value]> {
        match self {
            Self::List(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

/// Borrowed JSON object with lenient field accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a>(&'a Map<String, Value>);

impl<'a> Record<'a> {
    /// View a value as a record when it is a JSON object.
    #[must_use]
    pub const fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Field value when present and not `null`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Display text for a field; absent and `null` fields yield the placeholder.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        display_text(self.0.get(key))
    }

    /// Field value when it is a JSON string.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Field value when it is a non-empty JSON string.
    #[must_use]
    pub fn non_empty_string(&self, key: &str) -> Option<&'a str> {
        self.string(key).filter(|text| !text.is_empty())
    }

    /// Field value when it is a JSON array.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<&'a [Value]> {
        self.0.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Field value when it is a non-empty JSON array.
    #[must_use]
    pub fn non_empty_list(&self, key: &str) -> Option<&'a [Value]> {
        self.list(key).filter(|items| !items.is_empty())
    }
}

/// Convert any JSON value into display text. Never fails.
///
/// Strings are shown without quotes, numbers and booleans in their JSON form,
/// absent or `null` values as [`MISSING_PLACEHOLDER`], and nested arrays or
/// objects as compact JSON.
#[must_use]
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_PLACEHOLDER.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_distinguishes_envelope_shapes() {
        let object = json!({"data": {"id": "wh_1"}});
        let list = json!({"data": [1, 2]});
        let scalar = json!({"data": "oops"});
        let missing = json!({"error": "nope"});
        let not_an_object = json!([1, 2, 3]);

        assert!(matches!(ApiResponse::classify(&object), ApiResponse::Object(_)));
        assert!(matches!(ApiResponse::classify(&list), ApiResponse::List(items) if items.len() == 2));
        assert_eq!(ApiResponse::classify(&scalar), ApiResponse::Unknown);
        assert_eq!(ApiResponse::classify(&missing), ApiResponse::Unknown);
        assert_eq!(ApiResponse::classify(&not_an_object), ApiResponse::Unknown);
        assert_eq!(ApiResponse::classify(&Value::Null), ApiResponse::Unknown);
    }

    #[test]
    fn empty_list_is_not_a_non_empty_list() {
        let body = json!({"data": []});
        assert!(ApiResponse::classify(&body).non_empty_list().is_none());
    }

    #[test]
    fn display_text_covers_every_json_type() {
        assert_eq!(display_text(None), "-");
        assert_eq!(display_text(Some(&Value::Null)), "-");
        assert_eq!(display_text(Some(&json!("Office visit"))), "Office visit");
        assert_eq!(display_text(Some(&json!(true))), "true");
        assert_eq!(display_text(Some(&json!(0.92))), "0.92");
        assert_eq!(display_text(Some(&json!(250))), "250");
        assert_eq!(display_text(Some(&json!(["a", 1]))), r#"["a",1]"#);
        assert_eq!(display_text(Some(&json!({"k": "v"}))), r#"{"k":"v"}"#);
    }

    #[test]
    fn record_accessors_tolerate_wrong_types() {
        let value = json!({
            "status": 200,
            "error": "",
            "events": "not-a-list",
            "reasons": [],
            "confidence": null
        });
        let record = Record::from_value(&value).expect("object");

        assert_eq!(record.string("status"), None);
        assert_eq!(record.text("status"), "200");
        assert_eq!(record.non_empty_string("error"), None);
        assert_eq!(record.list("events"), None);
        assert_eq!(record.non_empty_list("reasons"), None);
        assert_eq!(record.value("confidence"), None);
        assert_eq!(record.text("missing"), "-");
        assert!(Record::from_value(&json!("scalar")).is_none());
    }
}
