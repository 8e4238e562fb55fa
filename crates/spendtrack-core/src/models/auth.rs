use serde::{Deserialize, Serialize};

use super::User;

/// Body of `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a successful `POST /login`.
///
/// Both fields are optional on the wire: a response without a token is a
/// distinct outcome rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `POST /register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_uses_camel_case_name() {
        let request = RegisterRequest {
            full_name: "John Doe".to_string(),
            email: "john@me.com".to_string(),
            password: "secret".to_string(),
        };
        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(
            value,
            json!({"fullName": "John Doe", "email": "john@me.com", "password": "secret"})
        );
    }

    #[test]
    fn test_login_response_without_token() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"user": {"id": 1}}"#).expect("response parses");
        assert!(resp.token.is_none());
        assert!(resp.user.is_some());

        let resp: LoginResponse = serde_json::from_str("{}").expect("empty response parses");
        assert_eq!(resp, LoginResponse::default());
    }
}
