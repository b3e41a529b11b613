//! RS256 token issuance and validation.
//!
//! The private key only signs and the public key only verifies, so a
//! verifier can be handed the public half alone.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::TOKEN_EXPIRATION_HOURS;
use crate::domain::{TokenClaims, TokenService, User};
use crate::errors::{AppError, AppResult};

/// JWT implementation of [`TokenService`].
///
/// Only constructible from loaded key material.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    validation: Validation,
}

impl JwtTokenService {
    /// Build from PEM encoded RSA keys.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8], issuer: impl Into<String>) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AppError::config(format!("Invalid RSA private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AppError::config(format!("Invalid RSA public key: {}", e)))?;
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Ok(Self {
            encoding_key,
            decoding_key,
            issuer,
            validation,
        })
    }

    /// Load the key pair from disk.
    pub fn from_files(
        private_key_path: &Path,
        public_key_path: &Path,
        issuer: impl Into<String>,
    ) -> AppResult<Self> {
        let read = |path: &Path| {
            std::fs::read(path).map_err(|e| {
                AppError::config(format!("Failed to load RSA key {}: {}", path.display(), e))
            })
        };

        let service = Self::from_pem(&read(private_key_path)?, &read(public_key_path)?, issuer)?;
        tracing::info!("RSA keys loaded");
        Ok(service)
    }

    fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> AppResult<String> {
        let iat = issued_at.timestamp();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat,
            nbf: iat,
            exp: (issued_at + Duration::hours(TOKEN_EXPIRATION_HOURS)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {}", e)))
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user: &User) -> AppResult<String> {
        self.issue_at(user, Utc::now())
    }

    fn validate_token(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = ?e.kind(), "Token rejected");
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/jwt_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/jwt_public.pem");
    const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/other_private.pem");

    fn service() -> JwtTokenService {
        JwtTokenService::from_pem(PRIVATE_PEM, PUBLIC_PEM, "admin-api-test").unwrap()
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "JANE DOE".into(),
            email: "jane@example.com".into(),
            password: None,
            img: None,
            role,
            status: true,
            email_validated: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_round_trip_claims() {
        let service = service();
        let user = user(UserRole::Admin);

        let token = service.generate_token(&user).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.iss, "admin-api-test");
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_expires_after_twenty_four_hours() {
        let service = service();
        let before = Utc::now().timestamp();
        let claims = service
            .validate_token(&service.generate_token(&user(UserRole::User)).unwrap())
            .unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!((claims.iat - before).abs() <= 5);
    }

    #[test]
    fn test_unique_token_ids() {
        let service = service();
        let user = user(UserRole::User);
        let first = service.validate_token(&service.generate_token(&user).unwrap()).unwrap();
        let second = service.validate_token(&service.generate_token(&user).unwrap()).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let issued = Utc::now() - Duration::hours(48);
        let token = service.issue_at(&user(UserRole::User), issued).unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_not_yet_valid_token_rejected() {
        let service = service();
        let issued = Utc::now() + Duration::hours(1);
        let token = service.issue_at(&user(UserRole::User), issued).unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let now = Utc::now();
        let user = user(UserRole::Admin);
        let claims = TokenClaims {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            iss: "admin-api-test".into(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(PUBLIC_PEM),
        )
        .unwrap();

        assert!(matches!(
            service().validate_token(&forged),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let foreign = JwtTokenService::from_pem(OTHER_PRIVATE_PEM, PUBLIC_PEM, "admin-api-test")
            .unwrap();
        let token = foreign.generate_token(&user(UserRole::User)).unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let other = JwtTokenService::from_pem(PRIVATE_PEM, PUBLIC_PEM, "someone-else").unwrap();
        let token = other.generate_token(&user(UserRole::User)).unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        for token in ["", "garbage", "a.b.c"] {
            assert!(matches!(
                service().validate_token(token),
                Err(AppError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_invalid_key_material() {
        assert!(matches!(
            JwtTokenService::from_pem(b"not a key", PUBLIC_PEM, "x"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_missing_key_file() {
        let result = JwtTokenService::from_files(
            Path::new("/nonexistent/private.pem"),
            Path::new("/nonexistent/public.pem"),
            "x",
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
