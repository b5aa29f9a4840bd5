use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::GatewayError;
use common::jwt::{self, JwtValidationError, SubjectClaims};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::instrument;

/// Hash a password with bcrypt using a configurable cost factor.
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `cost` - Bcrypt cost factor (2^cost iterations). Valid range: 10-14.
///
/// # Errors
///
/// Returns `GatewayError::Crypto` if:
/// - Cost is outside the valid range (10-14)
/// - Bcrypt hashing fails
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, GatewayError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(GatewayError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| GatewayError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, GatewayError> {
    bcrypt::verify(password, hash)
        .map_err(|e| GatewayError::Crypto(format!("Password verification failed: {}", e)))
}

/// Sign access token claims with HS256.
#[instrument(skip_all)]
pub fn sign_token(claims: &SubjectClaims, secret: &[u8]) -> Result<String, GatewayError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &EncodingKey::from_secret(secret))
        .map_err(|e| GatewayError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an access token's size and HS256 signature and decode its claims.
///
/// Expiry is NOT checked here: the caller compares `exp` against its own
/// clock so that time can be controlled in tests. Only HS256 is accepted, so
/// `alg: none` and algorithm-confusion tokens fail as malformed.
#[instrument(skip_all)]
pub fn verify_token(token: &str, secret: &[u8]) -> Result<SubjectClaims, JwtValidationError> {
    jwt::check_size(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<SubjectClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            tracing::debug!(target: "gw.crypto", error = %e, "Token verification failed");
            JwtValidationError::MalformedToken
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn claims(sub: &str) -> SubjectClaims {
        SubjectClaims {
            sub: sub.to_string(),
            exp: 4_000_000_000,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("admin123", MIN_BCRYPT_COST).unwrap();

        assert_ne!(hash, "admin123");
        assert!(hash.starts_with("$2b$10$"));
        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("admin124", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("same-password", MIN_BCRYPT_COST).unwrap();
        let second = hash_password("same-password", MIN_BCRYPT_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_rejects_cost_outside_range() {
        for cost in [4, 9, 15, 31] {
            let result = hash_password("pw", cost);
            assert!(
                matches!(result, Err(GatewayError::Crypto(ref msg)) if msg.contains("Invalid bcrypt cost")),
                "cost {} should be rejected",
                cost
            );
        }
    }

    #[test]
    fn test_verify_password_against_garbage_hash_errors() {
        let result = verify_password("pw", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(GatewayError::Crypto(_))));
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let token = sign_token(&claims("alice"), SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded, claims("alice"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = sign_token(&claims("alice"), SECRET).unwrap();
        let result = verify_token(&token, b"another-secret-another-secret-xx");
        assert_eq!(result, Err(JwtValidationError::MalformedToken));
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let token = sign_token(&claims("alice"), SECRET).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, sig.get(1..).unwrap());

        assert_eq!(
            verify_token(&tampered, SECRET),
            Err(JwtValidationError::MalformedToken)
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        for token in ["", "not-a-jwt", "a.b", "a.b.c", "...."] {
            assert_eq!(
                verify_token(token, SECRET),
                Err(JwtValidationError::MalformedToken),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_verify_rejects_oversized_token() {
        let token = "a".repeat(common::jwt::MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(
            verify_token(&token, SECRET),
            Err(JwtValidationError::TokenTooLarge)
        );
    }

    #[test]
    fn test_verify_rejects_other_algorithm() {
        let header = Header::new(Algorithm::HS512);
        let token = encode(&header, &claims("alice"), &EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(
            verify_token(&token, SECRET),
            Err(JwtValidationError::MalformedToken)
        );
    }

    #[test]
    fn test_verify_does_not_check_expiry() {
        let expired = SubjectClaims {
            sub: "alice".to_string(),
            exp: 1,
            iat: 0,
        };
        let token = sign_token(&expired, SECRET).unwrap();

        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded.exp, 1);
    }
}
