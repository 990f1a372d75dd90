use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a user record.
///
/// On the wire an id is a plain JSON string (`"4"`). Ids minted by the store
/// are decimal renderings of a sequence number, but any string is accepted
/// for lookups so that clients can ask for ids that never existed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id the store mints for sequence number `seq`.
    pub fn from_seq(seq: u64) -> Self {
        Self(seq.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_seq_is_decimal() {
        assert_eq!(UserId::from_seq(4).as_str(), "4");
        assert_eq!(UserId::from_seq(120).to_string(), "120");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::from("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn user_json_shape() {
        let user = User::new(UserId::from("1"), "Alice", "alice@x.com");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "1", "name": "Alice", "email": "alice@x.com"})
        );

        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
    }
}
