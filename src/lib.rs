//! # Signed JSON Web Tokens
//!
//! A Rust implementation of compact JSON Web Tokens (RFC 7519) secured with
//! JSON Web Signatures (RFC 7515).
//!
//! ## Overview
//!
//! Tokens are issued by serializing claims and signing them with one private
//! key. They are verified against a [`KeyRegister`] holding any number of
//! trusted keys per signature family. The token's `alg` header selects the
//! family, and the optional `kid` header narrows the candidate keys.
//!
//! ## Features
//!
//! - ECDSA (ES256, ES384, ES512), EdDSA (Ed25519), HMAC (HS256, HS384, HS512)
//!   and RSA (RS256, RS384, RS512, PS256, PS384, PS512)
//! - Caller-defined algorithm identifiers through an immutable [`AlgorithmTable`]
//! - Registered claims (issuer, subject, audience, expiration, etc.) and
//!   arbitrary custom JSON claims
//! - Rejection of unsecured (`"none"`) tokens and of critical header extensions
//! - Key import from JWK, JWK Sets and PEM
//! - Bearer token authorization for [`http`] requests in [`web`]
//!
//! ## Basic Example
//!
//! ```rust
//! use signed_jwt::{
//!     AlgorithmTable, EcdsaPrivateKey, Key, KeyRegister, RegisteredClaims, SigningKey,
//!     TokenBuilder, VerificationOptions, NumericTime,
//! };
//!
//! // Create a key for signing and register its public part for verification
//! let private_key = EcdsaPrivateKey::generate_p256();
//! let mut keys = KeyRegister::new();
//! keys.add(Key::Ecdsa(private_key.public_key()), Some("example-key-id"));
//!
//! // Create a token
//! let token = TokenBuilder::new()
//!     .key_id("example-key-id")
//!     .registered_claims(
//!         RegisteredClaims::new()
//!             .with_issuer("example-issuer")
//!             .with_subject("example-subject")
//!             .with_audience("example-audience"),
//!     )
//!     .expires_in_secs(3600) // 1 hour from now
//!     .sign(&SigningKey::Ecdsa(private_key), AlgorithmTable::standard())
//!     .expect("Failed to sign token");
//!
//! // Verify the signature
//! let claims = keys
//!     .check(token.as_bytes(), AlgorithmTable::standard())
//!     .expect("Failed to verify signature");
//!
//! // Verify the claims
//! let options = VerificationOptions::new()
//!     .verify_exp(true)
//!     .expected_issuer("example-issuer");
//!
//! claims
//!     .verify_claims(&options, NumericTime::now())
//!     .expect("Failed to verify claims");
//! assert_eq!(claims.registered.sub.as_deref(), Some("example-subject"));
//! ```

pub mod algorithm;
pub mod claims;
pub mod constants;
pub mod ecdsa;
pub mod eddsa;
pub mod error;
pub mod header;
pub mod hmac;
pub mod register;
pub mod rsa;
pub mod token;
pub mod utils;
pub mod web;

pub use algorithm::{AlgorithmTable, Family, Hash};
pub use claims::{Claims, ClaimsMap, NumericTime, RegisteredClaims, VerificationOptions};
pub use ecdsa::{EcdsaPrivateKey, EcdsaPublicKey};
pub use error::Error;
pub use header::Header;
pub use crate::hmac::Hmac;
pub use register::{Key, KeyRegister};
pub use token::{SigningKey, Token, TokenBuilder};
pub use utils::current_timestamp;

#[cfg(test)]
mod tests;
