use crate::config::parameter;
use crate::dto::token_dto::{TokenClaimsDto, TokenScope};
use crate::error::token_error::TokenError;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Signs and validates the three token kinds (access, refresh, email
/// verification). One secret and one algorithm are shared across kinds, so
/// the scope claim is the only discriminator and is checked on every decode.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    email_ttl: Duration,
}

pub trait TokenServiceTrait {
    fn new(
        secret: String,
        access_ttl_seconds: i64,
        refresh_ttl_days: i64,
        email_ttl_days: i64,
    ) -> Result<Self, TokenError>
    where
        Self: Sized;
    fn from_parameters() -> Result<Self, TokenError>
    where
        Self: Sized;
    fn issue(&self, subject: &str, scope: TokenScope, ttl: Option<Duration>) -> Result<String, TokenError>;
    fn decode(&self, token: &str, expected_scope: TokenScope) -> Result<TokenClaimsDto, TokenError>;
    fn access_ttl_seconds(&self) -> u64;
}

impl TokenServiceTrait for TokenService {
    fn new(
        secret: String,
        access_ttl_seconds: i64,
        refresh_ttl_days: i64,
        email_ttl_days: i64,
    ) -> Result<Self, TokenError> {
        // 256-bit minimum for an HS256 key
        if secret.len() < 32 {
            return Err(TokenError::TokenCreationError(format!(
                "JWT secret must be at least 32 bytes, current length: {}",
                secret.len()
            )));
        }

        Ok(Self {
            secret,
            access_ttl: Duration::seconds(access_ttl_seconds),
            refresh_ttl: Duration::days(refresh_ttl_days),
            email_ttl: Duration::days(email_ttl_days),
        })
    }

    fn from_parameters() -> Result<Self, TokenError> {
        Self::new(
            parameter::get("JWT_SECRET"),
            parameter::get_i64("ACCESS_TOKEN_TTL_SECONDS"),
            parameter::get_i64("REFRESH_TOKEN_TTL_DAYS"),
            parameter::get_i64("EMAIL_TOKEN_TTL_DAYS"),
        )
    }

    fn issue(&self, subject: &str, scope: TokenScope, ttl: Option<Duration>) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(match scope {
            TokenScope::AccessToken => self.access_ttl,
            TokenScope::RefreshToken => self.refresh_ttl,
            TokenScope::EmailToken => self.email_ttl,
        });

        let now = chrono::Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::TokenCreationError("Token expiration calculation overflow".to_string()))?;

        let claims = TokenClaimsDto {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            scope,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| TokenError::TokenCreationError(e.to_string()))
    }

    fn decode(&self, token: &str, expected_scope: TokenScope) -> Result<TokenClaimsDto, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // clock skew

        let data = decode::<TokenClaimsDto>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            _ => TokenError::InvalidToken,
        })?;

        if data.claims.scope != expected_scope {
            return Err(TokenError::ScopeMismatch);
        }

        Ok(data.claims)
    }

    fn access_ttl_seconds(&self) -> u64 {
        self.access_ttl.num_seconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("0123456789abcdef0123456789abcdef".to_string(), 900, 7, 3).unwrap()
    }

    #[test]
    fn test_secret_length_enforced() {
        let result = TokenService::new("short".to_string(), 900, 7, 3);
        assert!(matches!(result, Err(TokenError::TokenCreationError(_))));
    }

    #[test]
    fn test_issue_and_decode_access_token() {
        let svc = service();
        let token = svc.issue("a@x.com", TokenScope::AccessToken, None).unwrap();
        let claims = svc.decode(&token, TokenScope::AccessToken).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.scope, TokenScope::AccessToken);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_scope_mismatch_rejected() {
        let svc = service();
        let refresh = svc.issue("a@x.com", TokenScope::RefreshToken, None).unwrap();

        // A refresh token presented as an access token must fail even though
        // the signature is valid.
        assert_eq!(svc.decode(&refresh, TokenScope::AccessToken), Err(TokenError::ScopeMismatch));
        assert!(svc.decode(&refresh, TokenScope::RefreshToken).is_ok());

        let email = svc.issue("a@x.com", TokenScope::EmailToken, None).unwrap();
        assert_eq!(svc.decode(&email, TokenScope::AccessToken), Err(TokenError::ScopeMismatch));
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        // Past the 30s leeway
        let token = svc
            .issue("a@x.com", TokenScope::AccessToken, Some(Duration::seconds(-120)))
            .unwrap();
        assert_eq!(svc.decode(&token, TokenScope::AccessToken), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let token = svc.issue("a@x.com", TokenScope::AccessToken, None).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert_eq!(svc.decode(&tampered, TokenScope::AccessToken), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new("ffffffffffffffffffffffffffffffff".to_string(), 900, 7, 3).unwrap();
        let token = svc.issue("a@x.com", TokenScope::AccessToken, None).unwrap();

        assert_eq!(other.decode(&token, TokenScope::AccessToken), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_ttl_override() {
        let svc = service();
        let token = svc
            .issue("a@x.com", TokenScope::AccessToken, Some(Duration::seconds(60)))
            .unwrap();
        let claims = svc.decode(&token, TokenScope::AccessToken).unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
    }
}
