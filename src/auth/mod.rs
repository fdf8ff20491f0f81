use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Fallback email when the issuing service mints a minimal token.
const DEFAULT_EMAIL: &str = "unknown@example.com";

/// JWT claims. Only `sub` is mandatory; the rest default rather than fail.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub subscription_level: Option<String>,
    pub org_id: Option<String>,
    pub exp: i64,
    pub iat: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionLevel {
    Free,
    Club,
    Premium,
}

impl SubscriptionLevel {
    /// Unknown tiers fall back to free rather than rejecting the token.
    pub fn parse(value: &str) -> Self {
        match value {
            "club" => SubscriptionLevel::Club,
            "premium" => SubscriptionLevel::Premium,
            _ => SubscriptionLevel::Free,
        }
    }
}

/// Authenticated principal, built once per request from a validated bearer
/// token and discarded at request end.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub subscription_level: SubscriptionLevel,
    pub org_id: Option<String>,
}

impl AuthUser {
    /// Premium-only notification types are visible to every tier except free.
    pub fn include_premium(&self) -> bool {
        self.subscription_level != SubscriptionLevel::Free
    }

    pub fn from_claims(claims: Claims) -> Result<Self, ApiError> {
        let sub = claims
            .sub
            .ok_or_else(|| ApiError::unauthorized("Invalid token payload"))?;
        let user_id = Uuid::parse_str(&sub)
            .map_err(|_| ApiError::unauthorized("Invalid token payload"))?;

        Ok(Self {
            user_id,
            email: claims.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            subscription_level: claims
                .subscription_level
                .as_deref()
                .map(SubscriptionLevel::parse)
                .unwrap_or(SubscriptionLevel::Free),
            org_id: claims.org_id,
        })
    }
}

/// Verify a bearer token's signature and expiry against the configured
/// secret and algorithm.
pub fn verify_bearer_token(token: &str, config: &AppConfig) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(config.jwt_algorithm);

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::warn!(error = %e, "invalid jwt token");
        ApiError::unauthorized("Invalid authentication credentials")
    })?;

    Ok(data.claims)
}

fn bearer_token_from_parts(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("Empty bearer token"));
    }
    Ok(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token_from_parts(parts)?;
        let claims = verify_bearer_token(token, &state.config)?;
        AuthUser::from_claims(claims)
    }
}

/// Marker extractor for server-to-server calls. Validates the
/// `X-Service-Token` header by exact string equality against the configured
/// shared secret.
#[derive(Debug, Clone, Copy)]
pub struct ServiceAuth;

#[axum::async_trait]
impl FromRequestParts<AppState> for ServiceAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("x-service-token")
            .and_then(|v| v.to_str().ok());

        match token {
            Some(token) if token == state.config.service_token => Ok(ServiceAuth),
            _ => {
                tracing::warn!("service token missing or mismatched");
                Err(ApiError::forbidden("Invalid service token"))
            }
        }
    }
}
