//! Best-effort inspection of loosely shaped JSON response bodies
//!
//! The service does not return a stable envelope: some responses are JSON
//! objects, some are bare quoted strings, some are empty. Nothing in this
//! module returns an error; callers decide whether a missing field fails a
//! step.

use serde_json::Value;

/// Outcome of looking up a string field in a raw response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookup {
    /// The body is a JSON object with a string-valued property of that name
    Found(String),
    /// The body is blank, not an object, or has no string property of that name
    Absent,
    /// The body is not valid JSON
    Malformed,
}

impl FieldLookup {
    /// The found value, discarding why it might be missing
    pub fn found(self) -> Option<String> {
        match self {
            FieldLookup::Found(s) => Some(s),
            FieldLookup::Absent | FieldLookup::Malformed => None,
        }
    }
}

/// Look up `key` as a string property of the JSON object in `raw_body`
///
/// An exact property name wins; otherwise the first ASCII case-insensitive
/// match is used.
pub fn extract_string_field(raw_body: &str, key: &str) -> FieldLookup {
    if raw_body.trim().is_empty() {
        return FieldLookup::Absent;
    }

    let value: Value = match serde_json::from_str(raw_body) {
        Ok(v) => v,
        Err(_) => return FieldLookup::Malformed,
    };

    let Some(object) = value.as_object() else {
        return FieldLookup::Absent;
    };

    let property = object.get(key).or_else(|| {
        object
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    });

    match property.and_then(Value::as_str) {
        Some(s) => FieldLookup::Found(s.to_string()),
        None => FieldLookup::Absent,
    }
}

/// Strip surrounding whitespace and double quotes
///
/// Handles servers that answer with a bare JSON string such as
/// `"Deleted successfully!"` instead of an object. Strips repeatedly rather
/// than one layer, so `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || c == '"')
        .to_string()
}

/// The `msg` field of the body, or the normalized body when there is none
pub fn message_or_body(raw_body: &str) -> String {
    extract_string_field(raw_body, "msg")
        .found()
        .unwrap_or_else(|| normalize(raw_body))
}

/// Length of the body when it parses as a JSON array
pub fn array_len(raw_body: &str) -> Option<usize> {
    serde_json::from_str::<Value>(raw_body)
        .ok()
        .and_then(|v| v.as_array().map(Vec::len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_string_property() {
        assert_eq!(
            extract_string_field(r#"{"storyId":"abc","msg":"ok"}"#, "storyId"),
            FieldLookup::Found("abc".into())
        );
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(
            extract_string_field(r#"{"AccessToken":"tok"}"#, "accessToken"),
            FieldLookup::Found("tok".into())
        );
        // exact match preferred over a case variant
        assert_eq!(
            extract_string_field(r#"{"ID":"upper","id":"lower"}"#, "id"),
            FieldLookup::Found("lower".into())
        );
    }

    #[test]
    fn test_absent_cases() {
        assert_eq!(extract_string_field("", "msg"), FieldLookup::Absent);
        assert_eq!(extract_string_field("   \n", "msg"), FieldLookup::Absent);
        assert_eq!(extract_string_field(r#"{"other":"x"}"#, "msg"), FieldLookup::Absent);
        assert_eq!(extract_string_field(r#"[{"msg":"x"}]"#, "msg"), FieldLookup::Absent);
        assert_eq!(extract_string_field(r#""just a string""#, "msg"), FieldLookup::Absent);
        assert_eq!(extract_string_field(r#"{"id":42}"#, "id"), FieldLookup::Absent);
        assert_eq!(extract_string_field(r#"{"msg":null}"#, "msg"), FieldLookup::Absent);
    }

    #[test]
    fn test_malformed_never_panics() {
        for body in ["{", "not json", "<html>oops</html>", "{\"msg\":", "\u{0}"] {
            assert_eq!(extract_string_field(body, "msg"), FieldLookup::Malformed);
            assert_eq!(extract_string_field(body, "msg").found(), None);
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  \"Deleted successfully!\"\n"), "Deleted successfully!");
        assert_eq!(normalize("plain"), "plain");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\"\""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "  ",
            "\"\"a\"\"",
            "\" a \"",
            " \"\" x",
            "Say \"hi\"",
            "\"Successfully edited\"",
            "\t\"\t\"\t",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_message_or_body() {
        assert_eq!(message_or_body(r#"{"msg":"Deleted successfully!"}"#), "Deleted successfully!");
        assert_eq!(message_or_body("\"Deleted successfully!\""), "Deleted successfully!");
        assert_eq!(
            message_or_body("Unable to delete this story spoiler!"),
            "Unable to delete this story spoiler!"
        );
    }

    #[test]
    fn test_array_len() {
        assert_eq!(array_len("[1,2,3]"), Some(3));
        assert_eq!(array_len("[]"), Some(0));
        assert_eq!(array_len("{}"), None);
        assert_eq!(array_len("nope"), None);
    }
}
