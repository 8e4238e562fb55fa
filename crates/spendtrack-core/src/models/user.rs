use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The user record returned by the backend.
///
/// Its shape is owned by the backend, so it is kept as raw JSON. Accessors
/// read the handful of fields the shell displays when they are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Value);

impl User {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn full_name(&self) -> Option<&str> {
        self.str_field("fullName")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// Best available label for the status bar
    pub fn display_name(&self) -> String {
        self.full_name()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.email())
            .unwrap_or("Signed in")
            .to_string()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for User {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_accessors() {
        let user = User::new(json!({"id": 7, "fullName": "John Doe", "email": "john@me.com"}));
        assert_eq!(user.full_name(), Some("John Doe"));
        assert_eq!(user.email(), Some("john@me.com"));
        assert_eq!(user.display_name(), "John Doe");
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let user = User::new(json!({"fullName": "  ", "email": "john@me.com"}));
        assert_eq!(user.display_name(), "john@me.com");

        let user = User::new(json!({"id": 1}));
        assert_eq!(user.display_name(), "Signed in");
    }

    #[test]
    fn test_user_round_trips_unknown_fields() {
        let raw = json!({"id": 3, "profileImageUrl": null, "nested": {"a": [1, 2]}});
        let user: User = serde_json::from_value(raw.clone()).expect("user parses");
        assert_eq!(serde_json::to_value(&user).expect("user serializes"), raw);
    }
}
