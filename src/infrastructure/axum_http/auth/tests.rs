use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;
use uuid::Uuid;

const TEST_SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_AUTH_SECRET", TEST_SECRET);
    }
}

fn sample_claims(exp: usize) -> FitdeskClaims {
    FitdeskClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        facility_id: Uuid::new_v4(),
        role: "staff".to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    }
}

fn sign(claims: &FitdeskClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_validate_jwt_success() {
    set_env_vars();
    let my_claims = sample_claims(9999999999);

    let token = sign(&my_claims, TEST_SECRET);

    let claims = validate_jwt(&token).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.facility_id, my_claims.facility_id);
    assert_eq!(claims.email, my_claims.email);
}

#[test]
fn test_validate_jwt_expired() {
    set_env_vars();
    let my_claims = sample_claims(1);

    let token = sign(&my_claims, TEST_SECRET);

    let result = validate_jwt(&token);
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    set_env_vars();
    let my_claims = sample_claims(9999999999);

    let token = sign(&my_claims, "wrongsecret");

    let result = validate_jwt(&token);
    assert!(result.is_err());
}

#[test]
fn test_staff_role_gate() {
    let mut user = AuthUser {
        user_id: Uuid::new_v4(),
        facility_id: Uuid::new_v4(),
        role: "admin".to_string(),
        email: None,
    };
    assert!(user.is_staff());

    user.role = "staff".to_string();
    assert!(user.is_staff());

    user.role = "client".to_string();
    assert!(!user.is_staff());
}
