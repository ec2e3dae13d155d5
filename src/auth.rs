// ABOUTME: JWT authentication for identifying the current user on API requests
// ABOUTME: Token minting and validation plus bearer-header extraction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Authentication
//!
//! The auth subsystem proper (registration, passwords, sessions) lives
//! outside this server; routes only need "which user is calling, if any".
//! That identity arrives as a bearer JWT signed with the server secret.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::User;

/// JWT claims carried in a user token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated request context
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// The authenticated user's id
    pub user_id: Uuid,
}

/// Authentication manager for user JWT tokens
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub const fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
        }
    }

    /// Generate a JWT token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )
        .map_err(|e| AppError::internal("Failed to encode JWT").with_source(e))
    }

    /// Validate a JWT token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an auth error if the signature is invalid, the token has
    /// expired, or the token is malformed.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))
    }

    /// Resolve the user id from a `Bearer <token>` authorization value
    ///
    /// # Errors
    ///
    /// Returns an auth error when the value is not a bearer token or the
    /// token does not validate.
    pub fn authenticate(&self, auth_header: &str) -> AppResult<AuthResult> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Expected a bearer token"))?;
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;
        Ok(AuthResult { user_id })
    }
}

/// Authenticate a request from its headers, failing when anonymous
///
/// # Errors
///
/// Returns 401-mapped errors when the authorization header is missing or
/// does not hold a valid token.
pub fn authenticate_request(headers: &HeaderMap, auth: &AuthManager) -> AppResult<AuthResult> {
    let header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::auth_required)?;
    auth.authenticate(header)
}

/// Authenticate a request from its headers, tolerating anonymous callers
///
/// Absent authorization yields `Ok(None)`; a present but invalid token is
/// still an error so callers cannot silently lose their identity.
///
/// # Errors
///
/// Returns a 401-mapped error when an authorization header is present but
/// invalid.
pub fn authenticate_optional(
    headers: &HeaderMap,
    auth: &AuthManager,
) -> AppResult<Option<AuthResult>> {
    match headers.get("authorization").and_then(|h| h.to_str().ok()) {
        Some(header) => auth.authenticate(header).map(Some),
        None => Ok(None),
    }
}

/// Generate a random JWT secret for server bootstrap
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("cook@example.com", "cook", "Test", "Cook").unwrap()
    }

    fn manager() -> AuthManager {
        AuthManager::new(generate_jwt_secret().to_vec(), 24)
    }

    #[test]
    fn test_token_round_trip() {
        let auth = manager();
        let user = test_user();

        let token = auth.generate_token(&user).unwrap();
        let result = auth.authenticate(&format!("Bearer {token}")).unwrap();

        assert_eq!(result.user_id, user.id);
    }

    #[test]
    fn test_rejects_token_from_other_secret() {
        let user = test_user();
        let token = manager().generate_token(&user).unwrap();

        assert!(manager().validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_non_bearer_header() {
        let auth = manager();
        assert!(auth.authenticate("Token abc").is_err());
    }

    #[test]
    fn test_optional_auth_absent_is_anonymous() {
        let headers = HeaderMap::new();
        let result = authenticate_optional(&headers, &manager()).unwrap();
        assert!(result.is_none());
    }
}
