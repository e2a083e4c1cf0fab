use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{LoginInput, ProfileResponse, RegisterInput, UserWithToken},
    repository::UserRepository,
    telemetry::USERS_REGISTERED,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 tokens whose subject is the user id.
#[derive(Clone)]
pub struct TokenKeys {
    secret: String,
    lifetime: Duration,
}

impl TokenKeys {
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
        }
    }

    pub fn issue(&self, user_id: i32, now: OffsetDateTime) -> AppResult<String> {
        let claims = Claims {
            sub: user_id,
            exp: (now + self.lifetime).unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn verify(&self, token: &str) -> AppResult<i32> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.sub)
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenKeys,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, config: &Config) -> Self {
        Self {
            user_repo,
            tokens: TokenKeys::new(
                config.jwt_secret.clone(),
                Duration::hours(config.jwt_expires_in_hours),
            ),
        }
    }

    #[instrument(name = "auth.register", skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserWithToken> {
        validate_registration(&input)?;

        let email = input.email.trim().to_lowercase();

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user = self
            .user_repo
            .create(&email, &password_hash, input.name.trim())
            .await?;

        let token = self.tokens.issue(user.id, OffsetDateTime::now_utc())?;

        USERS_REGISTERED.add(1, &[]);

        tracing::info!(user_id = user.id, "User registered");

        Ok(UserWithToken::from_user(&user, token))
    }

    #[instrument(name = "auth.login", skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> AppResult<UserWithToken> {
        let user = self
            .user_repo
            .find_by_email(&input.email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        verify_password(&input.password, &user.password_hash)?;

        let token = self.tokens.issue(user.id, OffsetDateTime::now_utc())?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(UserWithToken::from_user(&user, token))
    }

    #[instrument(name = "auth.profile", skip(self))]
    pub async fn profile(&self, user_id: i32) -> AppResult<ProfileResponse> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(ProfileResponse::from)
            .ok_or(AppError::NotFound("User not found".to_string()))
    }

    #[instrument(name = "auth.validate_token", skip(self, token))]
    pub fn validate_token(&self, token: &str) -> AppResult<i32> {
        self.tokens.verify(token)
    }
}

fn validate_registration(input: &RegisterInput) -> AppResult<()> {
    if !input.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)
}
