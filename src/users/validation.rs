use serde_json::{Map, Value};

use crate::users::error::ValidationError;

const REQUIRED_FIELDS: [&str; 2] = ["username", "password"];

struct SizedField {
    name: &'static str,
    min: Option<usize>,
    max: Option<usize>,
}

// bcrypt only looks at the first 72 bytes of a password.
static SIZED_FIELDS: [SizedField; 2] = [
    SizedField {
        name: "username",
        min: Some(1),
        max: None,
    },
    SizedField {
        name: "password",
        min: Some(7),
        max: Some(72),
    },
];

fn field_str<'a>(fields: &'a Map<String, Value>, name: &str) -> &'a str {
    fields.get(name).and_then(Value::as_str).unwrap_or_default()
}

// Same set a JSON client's `trim()` strips: Unicode spaces and line breaks,
// plus U+FEFF, but not U+0085.
fn is_padding(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

fn trim_padding(raw: &str) -> &str {
    raw.trim_matches(is_padding)
}

/// Length in UTF-16 code units, the unit clients measure input in.
fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Credentials that passed every body-level check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Runs presence, type, whitespace and length checks in that order and
/// reports only the first failure. Uniqueness is checked by the caller.
pub fn validate_registration(body: &Value) -> Result<Credentials, ValidationError> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    if let Some(missing) = REQUIRED_FIELDS
        .into_iter()
        .find(|&f| !fields.contains_key(f))
    {
        return Err(ValidationError::missing_field(missing));
    }

    if let Some(non_string) = REQUIRED_FIELDS
        .into_iter()
        .find(|&f| fields.get(f).is_some_and(|v| !v.is_string()))
    {
        return Err(ValidationError::unexpected_type(non_string));
    }

    if let Some(padded) = REQUIRED_FIELDS.into_iter().find(|&f| {
        let raw = field_str(fields, f);
        trim_padding(raw) != raw
    }) {
        return Err(ValidationError::whitespace(padded));
    }

    let len = |name: &str| text_len(trim_padding(field_str(fields, name)));
    let too_short = SIZED_FIELDS
        .iter()
        .find(|s| s.min.is_some_and(|min| len(s.name) < min));
    let too_long = SIZED_FIELDS
        .iter()
        .find(|s| s.max.is_some_and(|max| len(s.name) > max));

    if let Some(field) = too_short {
        return Err(ValidationError::too_short(field.name, field.min.unwrap_or_default()));
    }
    if let Some(field) = too_long {
        return Err(ValidationError::too_long(field.name, field.max.unwrap_or_default()));
    }

    Ok(Credentials {
        username: field_str(fields, "username").to_string(),
        password: field_str(fields, "password").to_string(),
    })
}
