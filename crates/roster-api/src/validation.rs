//! Input validation for user procedures.
//!
//! Each procedure input has one parse function that takes the raw JSON
//! input and returns either the validated value or every field error found.
//! Validation never touches the store.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use roster_store::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum length of a user name, in characters.
pub const MIN_NAME_LEN: usize = 2;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// One violated constraint, located by a dotted path into the input.
///
/// An empty path refers to the input as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

pub type Validated<T> = Result<T, Vec<FieldError>>;

/// Raw input of `createUser`, as a typed caller builds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
}

impl CreateUserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A `createUser` input that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn into_parts(self) -> (String, String) {
        (self.name, self.email)
    }
}

/// Whether `email` matches the accepted address grammar.
pub fn is_valid_email(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default();
    !local.starts_with('.') && !email.contains("..") && EMAIL_PATTERN.is_match(email)
}

/// Validate an id given as a string.
pub fn validate_id(raw: &str) -> Validated<UserId> {
    if raw.is_empty() {
        return Err(vec![FieldError::root(
            "String must contain at least 1 character(s)",
        )]);
    }
    Ok(UserId::new(raw))
}

/// Validate the JSON input of an id-taking procedure.
pub fn parse_id(input: Option<&Value>) -> Validated<UserId> {
    match input {
        None | Some(Value::Null) => Err(vec![FieldError::root("Required")]),
        Some(Value::String(s)) => validate_id(s),
        Some(other) => Err(vec![FieldError::root(expected_string(other))]),
    }
}

/// Validate a typed `createUser` input.
pub fn validate_create_user(input: &CreateUserInput) -> Validated<NewUser> {
    let mut issues = Vec::new();
    check_name(&input.name, &mut issues);
    check_email(&input.email, &mut issues);
    if !issues.is_empty() {
        return Err(issues);
    }
    Ok(NewUser {
        name: input.name.clone(),
        email: input.email.clone(),
    })
}

/// Validate the JSON input of `createUser`, collecting every field error.
pub fn parse_create_user(input: Option<&Value>) -> Validated<NewUser> {
    let fields = match input {
        None | Some(Value::Null) => return Err(vec![FieldError::root("Required")]),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(vec![FieldError::root(format!(
                "Expected object, received {}",
                type_name(other)
            ))])
        }
    };

    let mut issues = Vec::new();
    let name = string_field(fields, "name", &mut issues);
    let email = string_field(fields, "email", &mut issues);
    if let Some(name) = name {
        check_name(name, &mut issues);
    }
    if let Some(email) = email {
        check_email(email, &mut issues);
    }

    match (name, email) {
        (Some(name), Some(email)) if issues.is_empty() => Ok(NewUser {
            name: name.to_string(),
            email: email.to_string(),
        }),
        _ => Err(issues),
    }
}

fn string_field<'a>(
    fields: &'a serde_json::Map<String, Value>,
    key: &str,
    issues: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match fields.get(key) {
        None | Some(Value::Null) => {
            issues.push(FieldError::new(key, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            issues.push(FieldError::new(key, expected_string(other)));
            None
        }
    }
}

fn check_name(name: &str, issues: &mut Vec<FieldError>) {
    if name.chars().count() < MIN_NAME_LEN {
        issues.push(FieldError::new(
            "name",
            format!("String must contain at least {MIN_NAME_LEN} character(s)"),
        ));
    }
}

fn check_email(email: &str, issues: &mut Vec<FieldError>) {
    if !is_valid_email(email) {
        issues.push(FieldError::new("email", "Invalid email"));
    }
}

fn expected_string(value: &Value) -> String {
    format!("Expected string, received {}", type_name(value))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
