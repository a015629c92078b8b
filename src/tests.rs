//! Tests for signed JSON Web Tokens

use crate::{
    algorithm::{AlgorithmTable, Hash},
    claims::{Claims, NumericTime, RegisteredClaims, VerificationOptions},
    ecdsa::EcdsaPrivateKey,
    error::Error,
    register::{Key, KeyRegister},
    token::{SigningKey, Token, TokenBuilder},
    utils::{decode_segment, encode_segment},
};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use rand::rngs::OsRng;
use rsa::{pkcs8::EncodePublicKey, RsaPrivateKey};
use serde_json::json;

static RSA_KEY: Lazy<RsaPrivateKey> =
    Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("Failed to generate RSA key"));

// RFC 7515, Appendix A.1
const RFC_TOKEN: &str = concat!(
    "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.",
    "eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ.",
    "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"
);
const RFC_KEY: &str =
    "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow";

fn rfc_key() -> Vec<u8> {
    decode_segment(RFC_KEY.as_bytes()).expect("Failed to decode key")
}

fn sample_claims() -> Claims {
    Claims::new()
        .with_registered_claims(
            RegisteredClaims::new()
                .with_issuer("issuer")
                .with_subject("subject")
                .with_audience("audience")
                .with_expiration(NumericTime::from_secs(current_time() + 3600))
                .with_not_before(NumericTime::from_secs(current_time()))
                .with_issued_at(NumericTime::from_secs(current_time()))
                .with_jti("token-id-1234"),
        )
        .with_claim("custom-string", json!("custom-string-value"))
        .with_claim("custom-int", json!(12345))
        .with_claim("nested", json!({"a": [1, 2, 3], "b": {"c": null}}))
}

fn current_time() -> u64 {
    crate::current_timestamp()
}

#[test]
fn test_rfc7515_hmac_vector() {
    let claims = Claims::hmac_check(RFC_TOKEN.as_bytes(), &rfc_key(), AlgorithmTable::standard())
        .expect("Failed to verify token");

    assert_eq!(claims.registered.iss.as_deref(), Some("joe"));
    assert_eq!(
        claims.registered.exp,
        Some(NumericTime::from_secs(1300819380))
    );
    assert_eq!(
        claims.get_claim("http://example.com/is_root"),
        Some(&json!(true))
    );
    // the payload bytes are kept exactly as received
    assert_eq!(
        claims.raw(),
        b"{\"iss\":\"joe\",\r\n \"exp\":1300819380,\r\n \"http://example.com/is_root\":true}"
    );
}

#[test]
fn test_rfc7515_vector_resigned() {
    let mut claims = Claims::hmac_check(RFC_TOKEN.as_bytes(), &rfc_key(), AlgorithmTable::standard())
        .expect("Failed to verify token");
    let token = claims
        .hmac_sign("HS256", &rfc_key(), AlgorithmTable::standard())
        .expect("Failed to sign token");

    let payload = token.split('.').nth(1).expect("Missing payload");
    assert_eq!(
        decode_segment(payload.as_bytes()).expect("Failed to decode payload"),
        br#"{"exp":1300819380,"http://example.com/is_root":true,"iss":"joe"}"#
    );
    Claims::hmac_check(token.as_bytes(), &rfc_key(), AlgorithmTable::standard())
        .expect("Failed to verify token");
}

#[test]
fn test_round_trip_every_family() {
    let table = AlgorithmTable::standard();
    let ed = ed25519_dalek::SigningKey::generate(&mut OsRng);
    let p256 = EcdsaPrivateKey::generate_p256();
    let p384 = EcdsaPrivateKey::generate_p384();
    let p521 = EcdsaPrivateKey::generate_p521();

    let mut keys = KeyRegister::new();
    keys.add(Key::EdDsa(ed.verifying_key()), None);
    keys.add(Key::Ecdsa(p256.public_key()), None);
    keys.add(Key::Ecdsa(p384.public_key()), None);
    keys.add(Key::Ecdsa(p521.public_key()), None);
    keys.add(Key::Rsa(RSA_KEY.to_public_key()), None);
    keys.add(Key::Secret(b"hmac-secret".to_vec()), None);

    let cases = [
        ("EdDSA", SigningKey::EdDsa(ed)),
        ("ES256", SigningKey::Ecdsa(p256)),
        ("ES384", SigningKey::Ecdsa(p384)),
        ("ES512", SigningKey::Ecdsa(p521)),
        ("HS256", SigningKey::Hmac(b"hmac-secret".to_vec())),
        ("HS384", SigningKey::Hmac(b"hmac-secret".to_vec())),
        ("HS512", SigningKey::Hmac(b"hmac-secret".to_vec())),
        ("RS256", SigningKey::Rsa(RSA_KEY.clone())),
        ("RS384", SigningKey::Rsa(RSA_KEY.clone())),
        ("RS512", SigningKey::Rsa(RSA_KEY.clone())),
        ("PS256", SigningKey::Rsa(RSA_KEY.clone())),
        ("PS384", SigningKey::Rsa(RSA_KEY.clone())),
        ("PS512", SigningKey::Rsa(RSA_KEY.clone())),
    ];

    for (alg, key) in cases {
        let mut claims = sample_claims();
        let token = key
            .sign(&mut claims, alg, table)
            .unwrap_or_else(|e| panic!("Failed to sign {alg}: {e}"));
        let verified = keys
            .check(token.as_bytes(), table)
            .unwrap_or_else(|e| panic!("Failed to verify {alg}: {e}"));

        assert_eq!(verified, claims, "claims differ for {alg}");
        assert_eq!(verified.custom, sample_claims().custom);
        assert!(verified.valid_now());
    }
}

#[test]
fn test_token_creation_and_verification() {
    let key = SigningKey::Hmac(b"test-key-for-hmac-sha256-algorithm".to_vec());
    let token = TokenBuilder::new()
        .algorithm("HS256")
        .key_id("test-key-1")
        .registered_claims(
            RegisteredClaims::new()
                .with_issuer("issuer")
                .with_subject("subject")
                .with_audience("audience"),
        )
        .claim("custom", json!("custom-string-value"))
        .valid_for_secs(3600)
        .sign(&key, AlgorithmTable::standard())
        .expect("Failed to sign token");

    let mut keys = KeyRegister::new();
    keys.add(
        Key::Secret(b"test-key-for-hmac-sha256-algorithm".to_vec()),
        Some("test-key-1"),
    );
    let claims = keys
        .check(token.as_bytes(), AlgorithmTable::standard())
        .expect("Failed to verify signature");

    let options = VerificationOptions::new()
        .verify_exp(true)
        .verify_nbf(true)
        .expected_issuer("issuer")
        .expected_audience("audience");
    claims
        .verify_claims(&options, NumericTime::now())
        .expect("Failed to verify claims");

    assert_eq!(claims.key_id.as_deref(), Some("test-key-1"));
    assert_eq!(claims.string("custom"), Some("custom-string-value"));
    assert_eq!(claims.string("aud"), Some("audience"));
}

#[test]
fn test_expired_token() {
    let mut claims = Claims::new().with_registered_claims(
        RegisteredClaims::new().with_expiration(NumericTime::from_secs(current_time() - 3600)),
    );
    let token = claims
        .hmac_sign("HS256", b"secret", AlgorithmTable::standard())
        .expect("Failed to sign token");

    // signature and time are independent gates
    let claims = Claims::hmac_check(token.as_bytes(), b"secret", AlgorithmTable::standard())
        .expect("Failed to verify signature");
    assert!(claims.is_expired());
    assert!(!claims.valid_now());
    match claims.verify_claims(&VerificationOptions::new(), NumericTime::now()) {
        Err(Error::Expired) => {}
        other => panic!("Expected Expired error, got {other:?}"),
    }
}

#[test]
fn test_not_yet_valid_token() {
    let now = current_time();
    let claims = Claims::new().with_registered_claims(
        RegisteredClaims::new().with_not_before(NumericTime::from_secs(now + 3600)),
    );
    match claims.verify_claims(&VerificationOptions::new(), NumericTime::from_secs(now)) {
        Err(Error::NotYetValid) => {}
        other => panic!("Expected NotYetValid error, got {other:?}"),
    }
    assert!(claims.valid(NumericTime::from_secs(now + 3600)));
    assert!(!claims.valid(NumericTime::from_secs_f64((now + 3600) as f64 - 0.5)));
}

#[test]
fn test_invalid_signature() {
    let mut claims = sample_claims();
    let token = claims
        .hmac_sign("HS256", b"correct-key", AlgorithmTable::standard())
        .expect("Failed to sign token");
    match Claims::hmac_check(token.as_bytes(), b"wrong-key", AlgorithmTable::standard()) {
        Err(Error::SignatureMismatch) => {}
        other => panic!("Expected SignatureMismatch error, got {other:?}"),
    }

    // flip one bit of the payload
    let mut tampered = token.into_bytes();
    let index = tampered.iter().position(|&b| b == b'.').expect("Missing dot") + 2;
    tampered[index] ^= 0x01;
    assert!(Claims::hmac_check(&tampered, b"correct-key", AlgorithmTable::standard()).is_err());
}

#[test]
fn test_critical_extension_rejected() {
    // {"alg":"HS256","crit":["exp"]}
    let header = encode_segment(br#"{"alg":"HS256","crit":["exp"]}"#);
    let mut claims = Claims::new();
    let unsigned = claims.build("HS256").expect("Failed to build token");
    let payload = unsigned.split('.').nth(1).expect("Missing payload");
    let token = format!("{header}.{payload}.");

    let mut keys = KeyRegister::new();
    keys.add(Key::Secret(b"secret".to_vec()), None);
    match keys.check(token.as_bytes(), AlgorithmTable::standard()) {
        Err(Error::UnsupportedCriticalExtension(crit)) => assert_eq!(crit, vec!["exp"]),
        other => panic!("Expected UnsupportedCriticalExtension error, got {other:?}"),
    }
}

#[test]
fn test_incomplete_tokens() {
    let mut claims = Claims::new();
    let token = claims
        .hmac_sign("HS256", b"secret", AlgorithmTable::standard())
        .expect("Failed to sign token");
    let header_only = token.split('.').next().expect("Missing header");
    let without_signature = token.rsplit_once('.').map(|(head, _)| head).expect("Missing dot");

    for candidate in [header_only, without_signature] {
        assert!(matches!(
            Claims::hmac_check(candidate.as_bytes(), b"secret", AlgorithmTable::standard()),
            Err(Error::IncompleteToken)
        ));
    }
}

#[test]
fn test_algorithm_confusion() {
    let table = AlgorithmTable::standard();

    // the RSA public key is public, so it must not work as an HMAC secret
    let rsa_public = RSA_KEY.to_public_key();
    let der = rsa_public
        .to_public_key_der()
        .expect("Failed to encode key")
        .into_vec();
    let mut rsa_only = KeyRegister::new();
    rsa_only.add(Key::Rsa(rsa_public), None);
    let token = Claims::new()
        .hmac_sign("HS256", &der, table)
        .expect("Failed to sign token");
    assert!(matches!(
        rsa_only.check(token.as_bytes(), table),
        Err(Error::SignatureMismatch)
    ));

    // 32-byte Ed25519 key material reused as an HMAC secret
    let ed = ed25519_dalek::SigningKey::generate(&mut OsRng);
    let mut hmac_only = KeyRegister::new();
    hmac_only.add(Key::Secret(ed.verifying_key().to_bytes().to_vec()), None);
    let token = Claims::new().eddsa_sign(&ed).expect("Failed to sign token");
    assert!(matches!(
        hmac_only.check(token.as_bytes(), table),
        Err(Error::SignatureMismatch)
    ));

    // an ECDSA token checked against EdDSA keys only
    let mut ed_only = KeyRegister::new();
    ed_only.add(Key::EdDsa(ed.verifying_key()), None);
    let token = Claims::new()
        .ecdsa_sign("ES256", &EcdsaPrivateKey::generate_p256(), table)
        .expect("Failed to sign token");
    assert!(matches!(
        ed_only.check(token.as_bytes(), table),
        Err(Error::SignatureMismatch)
    ));
}

#[test]
fn test_key_id_narrowing_ecdsa() {
    let table = AlgorithmTable::standard();
    let first = EcdsaPrivateKey::generate_p256();
    let second = EcdsaPrivateKey::generate_p256();
    let mut keys = KeyRegister::new();
    keys.add(Key::Ecdsa(first.public_key()), Some("first"));
    keys.add(Key::Ecdsa(second.public_key()), Some("second"));

    let mut claims = Claims::new().with_key_id("second");
    let token = claims
        .ecdsa_sign("ES256", &second, table)
        .expect("Failed to sign token");
    keys.check(token.as_bytes(), table)
        .expect("Failed to verify token");

    // same token relabelled for the first key
    let relabelled_header = encode_segment(br#"{"alg":"ES256","kid":"first"}"#);
    let (_, rest) = token.split_once('.').expect("Missing dot");
    let relabelled = format!("{relabelled_header}.{rest}");
    match keys.check(relabelled.as_bytes(), table) {
        Err(Error::SignatureMismatch) => {}
        other => panic!("Expected SignatureMismatch error, got {other:?}"),
    }
}

#[test]
fn test_custom_algorithm_table() {
    let table = AlgorithmTable::standard()
        .clone()
        .with_ecdsa("ES256K-LOCAL", Hash::Sha512)
        .with_hmac("HS-LOCAL", Hash::Sha384);
    let ec = EcdsaPrivateKey::generate_p384();
    let mut keys = KeyRegister::new();
    keys.add(Key::Ecdsa(ec.public_key()), None);
    keys.add(Key::Secret(b"secret".to_vec()), None);

    let token = Claims::new()
        .ecdsa_sign("ES256K-LOCAL", &ec, &table)
        .expect("Failed to sign token");
    keys.check(token.as_bytes(), &table)
        .expect("Failed to verify token");
    assert!(matches!(
        keys.check(token.as_bytes(), AlgorithmTable::standard()),
        Err(Error::UnknownAlgorithm(_))
    ));

    let token = TokenBuilder::new()
        .algorithm("HS-LOCAL")
        .sign(&SigningKey::Hmac(b"secret".to_vec()), &table)
        .expect("Failed to sign token");
    let scanned = Token::scan(token.as_bytes()).expect("Failed to scan token");
    assert_eq!(scanned.signature.len(), 48);
    keys.check(token.as_bytes(), &table)
        .expect("Failed to verify token");
}

#[test]
fn test_rsa_pkcs1_pem_import() {
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
    use rsa::pkcs8::LineEnding;

    let private_pem = RSA_KEY
        .to_pkcs1_pem(LineEnding::LF)
        .expect("Failed to encode key");
    let key = SigningKey::from_pkcs8_pem(&private_pem).expect("Failed to import key");
    assert_eq!(key.default_algorithm(), "RS256");

    let public_pem = RSA_KEY
        .to_public_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("Failed to encode key");
    let mut keys = KeyRegister::new();
    assert_eq!(
        keys.load_pem(public_pem.as_bytes(), None)
            .expect("Failed to load PEM"),
        1
    );

    let token = TokenBuilder::new()
        .algorithm("PS256")
        .sign(&key, AlgorithmTable::standard())
        .expect("Failed to sign token");
    keys.check(token.as_bytes(), AlgorithmTable::standard())
        .expect("Failed to verify token");
}

#[test]
fn test_rsa_jwk_import() {
    use rsa::traits::PublicKeyParts;

    let public = RSA_KEY.to_public_key();
    let jwk = format!(
        r#"{{"kty":"RSA","kid":"rsa-1","n":"{}","e":"{}"}}"#,
        encode_segment(&public.n().to_bytes_be()),
        encode_segment(&public.e().to_bytes_be())
    );
    let mut keys = KeyRegister::new();
    keys.load_jwk(jwk.as_bytes()).expect("Failed to load JWK");
    assert_eq!(keys.rsas, vec![public]);

    let mut claims = Claims::new().with_key_id("rsa-1");
    let token = claims
        .rsa_sign("RS512", &RSA_KEY, AlgorithmTable::standard())
        .expect("Failed to sign token");
    keys.check(token.as_bytes(), AlgorithmTable::standard())
        .expect("Failed to verify token");
}

proptest! {
    #[test]
    fn prop_unsecured_always_rejected(payload in "[ -~]{0,64}", signature in "[A-Za-z0-9_-]{0,16}") {
        // {"alg":"none"}
        let token = format!("eyJhbGciOiJub25lIn0.{payload}.{signature}");
        let table = AlgorithmTable::standard();
        let mut keys = KeyRegister::new();
        keys.add(Key::Secret(b"secret".to_vec()), None);

        prop_assert!(matches!(Token::scan(token.as_bytes()), Err(Error::Unsecured)));
        prop_assert!(matches!(keys.check(token.as_bytes(), table), Err(Error::Unsecured)));
        prop_assert!(matches!(
            Claims::hmac_check(token.as_bytes(), b"secret", table),
            Err(Error::Unsecured)
        ));
    }

    #[test]
    fn prop_hmac_round_trip(
        iss in "[a-z]{1,12}",
        exp in 0u64..=4_102_444_800,
        names in proptest::collection::vec("x-[a-z]{1,8}", 0..4),
        flag in any::<bool>(),
        count in any::<i32>(),
    ) {
        let mut claims = Claims::new().with_registered_claims(
            RegisteredClaims::new().with_issuer(iss).with_expiration(NumericTime::from_secs(exp)),
        );
        for name in names {
            claims = claims.with_claim(name, json!({"flag": flag, "count": count}));
        }

        let table = AlgorithmTable::standard();
        let token = claims.hmac_sign("HS512", b"secret", table).expect("Failed to sign token");
        let verified = Claims::hmac_check(token.as_bytes(), b"secret", table)
            .expect("Failed to verify token");
        prop_assert_eq!(verified, claims);
    }
}
