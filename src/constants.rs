//! # Constants for JSON Web Tokens
//!
//! This module provides centralized constants used throughout the library:
//! registered claim names, algorithm identifiers, JWK parameter values and
//! the precomputed header encodings used by the token builder.

/// Registered claim names as defined in RFC 7519, Section 4.1
pub mod claim_names {
    /// Issuer
    pub const ISS: &str = "iss";
    /// Subject
    pub const SUB: &str = "sub";
    /// Audience
    pub const AUD: &str = "aud";
    /// Expiration time
    pub const EXP: &str = "exp";
    /// Not before
    pub const NBF: &str = "nbf";
    /// Issued at
    pub const IAT: &str = "iat";
    /// JWT ID
    pub const JTI: &str = "jti";
}

/// Algorithm identifiers as defined in RFC 7518 and RFC 8037
pub mod algs {
    /// ECDSA using P-256 and SHA-256
    pub const ES256: &str = "ES256";
    /// ECDSA using P-384 and SHA-384
    pub const ES384: &str = "ES384";
    /// ECDSA using P-521 and SHA-512
    pub const ES512: &str = "ES512";
    /// Edwards-curve signatures with Ed25519
    pub const EDDSA: &str = "EdDSA";
    /// HMAC using SHA-256
    pub const HS256: &str = "HS256";
    /// HMAC using SHA-384
    pub const HS384: &str = "HS384";
    /// HMAC using SHA-512
    pub const HS512: &str = "HS512";
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    pub const PS256: &str = "PS256";
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    pub const PS384: &str = "PS384";
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    pub const PS512: &str = "PS512";
    /// RSASSA-PKCS1-v1_5 using SHA-256
    pub const RS256: &str = "RS256";
    /// RSASSA-PKCS1-v1_5 using SHA-384
    pub const RS384: &str = "RS384";
    /// RSASSA-PKCS1-v1_5 using SHA-512
    pub const RS512: &str = "RS512";
    /// Unsecured JWS, always rejected
    pub const NONE: &str = "none";
}

/// Base64url encodings of `{"alg":"<id>"}` for the standard algorithms
pub mod encoded_headers {
    use super::algs;

    /// Returns the precomputed header segment for `alg`, if there is one.
    pub fn lookup(alg: &str) -> Option<&'static str> {
        let encoded = match alg {
            algs::ES256 => "eyJhbGciOiJFUzI1NiJ9",
            algs::ES384 => "eyJhbGciOiJFUzM4NCJ9",
            algs::ES512 => "eyJhbGciOiJFUzUxMiJ9",
            algs::EDDSA => "eyJhbGciOiJFZERTQSJ9",
            algs::HS256 => "eyJhbGciOiJIUzI1NiJ9",
            algs::HS384 => "eyJhbGciOiJIUzM4NCJ9",
            algs::HS512 => "eyJhbGciOiJIUzUxMiJ9",
            algs::PS256 => "eyJhbGciOiJQUzI1NiJ9",
            algs::PS384 => "eyJhbGciOiJQUzM4NCJ9",
            algs::PS512 => "eyJhbGciOiJQUzUxMiJ9",
            algs::RS256 => "eyJhbGciOiJSUzI1NiJ9",
            algs::RS384 => "eyJhbGciOiJSUzM4NCJ9",
            algs::RS512 => "eyJhbGciOiJSUzUxMiJ9",
            _ => return None,
        };
        Some(encoded)
    }
}

/// JWK parameter values as defined in RFC 7518, Section 6 and RFC 8037
pub mod jwk_values {
    /// Elliptic curve key type
    pub const KTY_EC: &str = "EC";
    /// Octet key pair key type
    pub const KTY_OKP: &str = "OKP";
    /// RSA key type
    pub const KTY_RSA: &str = "RSA";
    /// Symmetric key type
    pub const KTY_OCT: &str = "oct";
    /// NIST P-256
    pub const CRV_P256: &str = "P-256";
    /// NIST P-384
    pub const CRV_P384: &str = "P-384";
    /// NIST P-521
    pub const CRV_P521: &str = "P-521";
    /// Ed25519
    pub const CRV_ED25519: &str = "Ed25519";
}
