//! Authentication service for login, token refresh and user management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Claims;
use shared::models::{Role, User};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new user (admin only)
#[derive(Debug, Deserialize)]
pub struct RegisterUserInput {
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: String,
    password_hash: String,
    role: String,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role: {}", self.role)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            name: self.name,
            role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, username, name, password_hash, role, is_active, last_login_at, created_at, updated_at";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Authenticate a user with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !row.is_active {
            return Err(AppError::Unauthorized {
                message: "Account is disabled".to_string(),
                message_id: "Akun dinonaktifkan".to_string(),
            });
        }

        let valid = verify(password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(row.id)
            .execute(&self.db)
            .await?;

        let role = Role::parse(&row.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role: {}", row.role)))?;

        let tokens = self.generate_tokens(row.id, &row.username, role)?;
        self.store_refresh_token(row.id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Refresh the access token using a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let record = sqlx::query_as::<_, (Uuid, String, String)>(
            r#"
            SELECT u.id, u.username, u.role
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid or expired refresh token".to_string(),
            message_id: "Token refresh tidak valid atau kedaluwarsa".to_string(),
        })?;

        let (user_id, username, role_str) = record;
        let role = Role::parse(&role_str)
            .ok_or_else(|| AppError::Internal(format!("Unknown role: {}", role_str)))?;

        // Revoke old refresh token
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user_id, &username, role)?;
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Register a new user account. The handler restricts this to admins.
    pub async fn register(&self, input: RegisterUserInput) -> AppResult<User> {
        let username = input.username.trim().to_lowercase();
        if username.len() < 3
            || username.len() > 32
            || !username
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username must be 3-32 lowercase alphanumeric characters".to_string(),
                message_id: "Nama pengguna harus 3-32 karakter alfanumerik huruf kecil".to_string(),
            });
        }
        if input.password.len() < 8 {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: "Password must be at least 8 characters".to_string(),
                message_id: "Kata sandi minimal 8 karakter".to_string(),
            });
        }

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(&username)
            .fetch_one(&self.db)
            .await?;
        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists".to_string(),
                message_id: "Nama pengguna sudah dipakai".to_string(),
            });
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&username)
        .bind(input.name.trim())
        .bind(&password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| crate::error::map_unique_violation(e, "username"))?;

        row.into_user()
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, username: &str, role: Role) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (simple random token; only its hash is stored)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage; stable across processes and restarts
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
