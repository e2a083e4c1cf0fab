use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserWithToken,
}

#[derive(Debug, Serialize)]
pub struct UserWithToken {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl UserWithToken {
    pub fn from_user(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn create_test_user() -> User {
        User {
            id: 1,
            email: "reader@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            name: "Avid Reader".to_string(),
            created_at: datetime!(2024-01-15 10:30:00 UTC),
            updated_at: datetime!(2024-01-16 15:45:00 UTC),
        }
    }

    #[test]
    fn test_user_with_token_from_user() {
        let user = create_test_user();
        let with_token = UserWithToken::from_user(&user, "jwt_token_here".to_string());

        assert_eq!(with_token.id, user.id);
        assert_eq!(with_token.email, user.email);
        assert_eq!(with_token.name, user.name);
        assert_eq!(with_token.token, "jwt_token_here");
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user();
        let json = serde_json::to_string(&user).expect("serialization should succeed");

        assert!(json.contains("\"email\":\"reader@example.com\""));
        assert!(json.contains("\"created_at\":\"2024-01-15T10:30:00Z\""));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hashed_password"));
    }

    #[test]
    fn test_register_input_deserialization() {
        let json = r#"{"email": "new@example.com", "password": "secret123", "name": "New Reader"}"#;
        let input: RegisterInput =
            serde_json::from_str(json).expect("deserialization should succeed");

        assert_eq!(input.email, "new@example.com");
        assert_eq!(input.password, "secret123");
        assert_eq!(input.name, "New Reader");
    }

    #[test]
    fn test_profile_response_from_user() {
        let profile: ProfileResponse = create_test_user().into();
        let json = serde_json::to_string(&profile).expect("serialization should succeed");

        assert_eq!(profile.id, 1);
        assert!(json.contains("\"name\":\"Avid Reader\""));
    }
}
