use http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use signed_jwt::web::{Challenge, Gate};
use signed_jwt::{
    AlgorithmTable, Claims, EcdsaPrivateKey, Key, KeyRegister, NumericTime, RegisteredClaims,
    SigningKey, TokenBuilder, VerificationOptions,
};

fn main() {
    // Keys for signing
    let hmac_secret = b"my-secret-key-for-hmac-sha256".to_vec();
    let ecdsa_key = EcdsaPrivateKey::generate_p256();

    // Trusted keys for verification, tagged with key identifiers
    let mut keys = KeyRegister::new();
    keys.add(Key::Secret(hmac_secret.clone()), Some("hmac-example"));
    keys.add(Key::Ecdsa(ecdsa_key.public_key()), Some("ecdsa-example"));

    let hmac_token = create_token(&SigningKey::Hmac(hmac_secret), "hmac-example");
    let ecdsa_token = create_token(&SigningKey::Ecdsa(ecdsa_key), "ecdsa-example");

    println!("HMAC token is {} bytes", hmac_token.len());
    println!("ECDSA token is {} bytes", ecdsa_token.len());

    verify_token(&keys, &hmac_token);
    verify_token(&keys, &ecdsa_token);

    authorize_request(keys, &ecdsa_token);
}

/// Create a token signed with the key's default algorithm
fn create_token(key: &SigningKey, kid: &str) -> String {
    TokenBuilder::new()
        .key_id(kid)
        .registered_claims(
            RegisteredClaims::new()
                .with_issuer("example-issuer")
                .with_subject("example-subject")
                .with_audience("example-audience"),
        )
        .claim("roles", json!(["reader", "writer"]))
        .valid_for_secs(3600)
        .sign(key, AlgorithmTable::standard())
        .expect("Failed to sign token")
}

/// Verify a token's signature, then its claims
fn verify_token(keys: &KeyRegister, token: &str) {
    let claims: Claims = keys
        .check(token.as_bytes(), AlgorithmTable::standard())
        .expect("Failed to verify token");

    let options = VerificationOptions::new()
        .require_exp(true)
        .expected_issuer("example-issuer")
        .expected_audience("example-audience");
    claims
        .verify_claims(&options, NumericTime::now())
        .expect("Failed to verify claims");

    println!(
        "Verified token for {} with key {}",
        claims.registered.sub.as_deref().unwrap_or("?"),
        claims.key_id.as_deref().unwrap_or("?")
    );
    if let Some(roles) = claims.get_claim("roles") {
        println!("  roles: {roles}");
    }
}

/// Authorize an HTTP request with the token as bearer credential
fn authorize_request(keys: KeyRegister, token: &str) {
    let gate = Gate::new(keys).project("sub", HeaderName::from_static("x-subject"));

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("Failed to build header"),
    );
    match gate.authorize(&mut headers, NumericTime::now()) {
        Ok(_) => println!("Request authorized as {:?}", headers.get("x-subject")),
        Err(challenge) => println!("Request rejected: {}", challenge.header_value()),
    }

    let mut anonymous = HeaderMap::new();
    if let Err(challenge @ Challenge::Missing) = gate.authorize(&mut anonymous, NumericTime::now())
    {
        let response: http::Response<()> = challenge.into_response();
        println!(
            "Anonymous request answered with {} and {:?}",
            response.status(),
            response.headers().get(http::header::WWW_AUTHENTICATE)
        );
    }
}
