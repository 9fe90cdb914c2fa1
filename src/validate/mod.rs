use serde_json::{Map, Value};
use thiserror::Error;

/// Per-field validation rule.
///
/// Scalar filters reject array-typed input; `Array` rejects scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter {
    /// Pass-through, no check.
    Any,
    /// Integer number, or a string parsing as one.
    Integer,
    /// Syntactically plausible email address.
    Email,
    /// Must be a JSON array.
    Array,
}

impl FieldFilter {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldFilter::Any => true,
            FieldFilter::Array => value.is_array(),
            FieldFilter::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.parse::<i64>().is_ok(),
                _ => false,
            },
            FieldFilter::Email => match value {
                Value::String(s) => is_plausible_email(s),
                _ => false,
            },
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return false;
    }
    let parts: Vec<&str> = email.split('@').collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub filter: FieldFilter,
}

impl FieldSpec {
    pub const fn new(name: &'static str, filter: FieldFilter) -> Self {
        Self { name, filter }
    }
}

/// Required/optional field sets for one handler. Constant per handler,
/// declared next to it.
#[derive(Debug, Clone, Copy)]
pub struct ValidationSpec {
    pub required: &'static [FieldSpec],
    pub optional: &'static [FieldSpec],
}

impl ValidationSpec {
    fn find(&self, name: &str) -> Option<&FieldSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|f| f.name == name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidateError {
    #[error("{0} is required!")]
    MissingField(String),

    #[error("{0} is invalid!")]
    InvalidField(String),
}

/// Payload fields that survived allow-list validation, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedInput(Map<String, Value>);

impl CleanedInput {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Check a decoded payload against a handler's field specs.
///
/// A non-object payload (including Null from an empty or unparsable body) is
/// treated as empty, so the first required field reports as missing rather
/// than surfacing a parse error. Required presence checks run first in
/// declared order; filter checks follow in payload order. Fields declared
/// neither required nor optional are dropped, not rejected.
pub fn validate(input: &Value, spec: &ValidationSpec) -> Result<CleanedInput, ValidateError> {
    let empty = Map::new();
    let payload = input.as_object().unwrap_or(&empty);

    for field in spec.required {
        if !payload.contains_key(field.name) {
            return Err(ValidateError::MissingField(field.name.to_string()));
        }
    }

    let mut cleaned = CleanedInput::default();
    for (name, value) in payload {
        let Some(field) = spec.find(name) else {
            continue;
        };
        if !field.filter.accepts(value) {
            return Err(ValidateError::InvalidField(name.clone()));
        }
        cleaned.insert(name.clone(), value.clone());
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPEC: ValidationSpec = ValidationSpec {
        required: &[
            FieldSpec::new("title", FieldFilter::Any),
            FieldSpec::new("body", FieldFilter::Any),
        ],
        optional: &[
            FieldSpec::new("parent", FieldFilter::Integer),
            FieldSpec::new("contact", FieldFilter::Email),
            FieldSpec::new("tags", FieldFilter::Array),
        ],
    };

    #[test]
    fn first_missing_required_field_reports_in_declared_order() {
        let err = validate(&json!({}), &SPEC).unwrap_err();
        assert_eq!(err, ValidateError::MissingField("title".into()));

        let err = validate(&json!({"title": "x"}), &SPEC).unwrap_err();
        assert_eq!(err, ValidateError::MissingField("body".into()));
    }

    #[test]
    fn null_payload_behaves_like_an_empty_one() {
        let err = validate(&Value::Null, &SPEC).unwrap_err();
        assert_eq!(err, ValidateError::MissingField("title".into()));
    }

    #[test]
    fn unknown_fields_are_dropped_not_rejected() {
        let cleaned = validate(
            &json!({"title": "x", "body": "y", "injected": "z"}),
            &SPEC,
        )
        .unwrap();
        assert!(cleaned.get("injected").is_none());
        assert_eq!(cleaned.str("title"), Some("x"));
    }

    #[test]
    fn integer_filter_accepts_numbers_and_numeric_strings() {
        let ok = json!({"title": "x", "body": "y", "parent": 7});
        assert!(validate(&ok, &SPEC).is_ok());

        let ok = json!({"title": "x", "body": "y", "parent": "7"});
        assert!(validate(&ok, &SPEC).is_ok());

        let bad = json!({"title": "x", "body": "y", "parent": 1.5});
        assert_eq!(
            validate(&bad, &SPEC).unwrap_err(),
            ValidateError::InvalidField("parent".into())
        );

        // Scalar filter rejects array input
        let bad = json!({"title": "x", "body": "y", "parent": [7]});
        assert!(validate(&bad, &SPEC).is_err());
    }

    #[test]
    fn email_filter_requires_plausible_address() {
        let ok = json!({"title": "x", "body": "y", "contact": "a@b.example"});
        assert!(validate(&ok, &SPEC).is_ok());

        for bad in ["not-an-email", "@b.example", "a@", "a@b@c.example"] {
            let payload = json!({"title": "x", "body": "y", "contact": bad});
            assert!(validate(&payload, &SPEC).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn array_filter_rejects_scalars() {
        let ok = json!({"title": "x", "body": "y", "tags": ["a", "b"]});
        assert!(validate(&ok, &SPEC).is_ok());

        let bad = json!({"title": "x", "body": "y", "tags": "a"});
        assert_eq!(
            validate(&bad, &SPEC).unwrap_err(),
            ValidateError::InvalidField("tags".into())
        );
    }

    #[test]
    fn validation_is_idempotent_on_its_own_output() {
        let payload = json!({
            "title": "x",
            "body": "y",
            "parent": 3,
            "tags": ["a"],
            "stray": true
        });
        let first = validate(&payload, &SPEC).unwrap();
        let second = validate(&first.clone().into_value(), &SPEC).unwrap();
        assert_eq!(first, second);
    }
}
