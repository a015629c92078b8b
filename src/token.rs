//! # Token codec
//!
//! The scanner splits a compact token `header.payload.signature` into its
//! three segments, decodes them and enforces the header rules. The builder
//! serializes claims into `header.payload.`, ready for a signature to be
//! appended.
//!
//! The bytes covered by every signature are the header segment, a dot and
//! the payload segment, as in RFC 7515.

use crate::algorithm::{AlgorithmTable, Family};
use crate::claims::{Claims, NumericTime, RegisteredClaims};
use crate::constants::algs;
use crate::ecdsa::EcdsaPrivateKey;
use crate::error::Error;
use crate::header::Header;
use crate::register::Key;
use crate::utils::{current_timestamp, decode_segment, encode_segment};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use serde_json::Value;

/// A scanned token
///
/// The signature is not verified by scanning. Use one of the `*_check`
/// functions on [`Claims`] or [`KeyRegister::check`](crate::KeyRegister::check).
///
/// # Example
///
/// ```
/// use signed_jwt::{Error, Token};
///
/// // RFC 7515, Appendix A.1
/// let token = Token::scan(concat!(
///     "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.",
///     "eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ.",
///     "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"
/// ).as_bytes()).unwrap();
///
/// assert_eq!(token.header.alg, "HS256");
/// assert_eq!(token.claims.registered.iss.as_deref(), Some("joe"));
/// assert_eq!(token.signature.len(), 32);
///
/// assert!(matches!(Token::scan(b"no-dots"), Err(Error::IncompleteToken)));
/// ```
#[derive(Debug, Clone)]
pub struct Token {
    /// Token header
    pub header: Header,
    /// Token claims
    pub claims: Claims,
    /// Decoded signature
    pub signature: Vec<u8>,
    signing_input: Vec<u8>,
}

impl Token {
    /// Scans a compact token.
    ///
    /// Checks run in a fixed order, and the first failure is returned:
    /// segment structure, header encoding and JSON, critical extensions,
    /// the unsecured `"none"` algorithm, payload encoding and JSON, then
    /// signature encoding.
    pub fn scan(token: &[u8]) -> Result<Self, Error> {
        let first = token.iter().position(|&b| b == b'.');
        let last = token.iter().rposition(|&b| b == b'.');
        let (first, last) = match (first, last) {
            (Some(first), Some(last)) if first < last => (first, last),
            _ => return Err(Error::IncompleteToken),
        };

        let header = Header::decode(&token[..first])?;

        let payload = decode_segment(&token[first + 1..last])
            .map_err(|_| Error::MalformedPayload("invalid base64url encoding".to_string()))?;
        let mut claims = Claims::from_payload(&payload)?;
        claims.key_id = header.key_id().map(str::to_string);

        let signature = decode_segment(&token[last + 1..])
            .map_err(|_| Error::MalformedSignature("invalid base64url encoding".to_string()))?;

        Ok(Self {
            header,
            claims,
            signature,
            signing_input: token[..last].to_vec(),
        })
    }

    /// The bytes the signature covers
    pub fn signing_input(&self) -> &[u8] {
        &self.signing_input
    }

    /// Consumes the token, keeping the claims
    pub fn into_claims(self) -> Claims {
        self.claims
    }

    /// The signing input of a built token, without its trailing dot.
    pub(crate) fn unsigned_input(token: &str) -> &[u8] {
        let bytes = token.as_bytes();
        bytes.strip_suffix(b".").unwrap_or(bytes)
    }

    /// Completes a built token.
    pub(crate) fn append_signature(token: &mut String, signature: &[u8]) {
        token.push_str(&encode_segment(signature));
    }
}

impl Claims {
    /// Serializes the header and claims into `header.payload.`.
    ///
    /// The claims are synchronized first, so [`Claims::raw`] holds exactly
    /// the payload JSON afterwards. The key identifier, when set and not
    /// empty, goes into the header.
    ///
    /// ```
    /// use signed_jwt::Claims;
    ///
    /// let unsigned = Claims::new().build("HS256").unwrap();
    /// assert_eq!(unsigned, "eyJhbGciOiJIUzI1NiJ9.e30.");
    /// ```
    pub fn build(&mut self, alg: &str) -> Result<String, Error> {
        let mut header = Header::new(alg);
        if let Some(kid) = self.key_id.as_deref().filter(|kid| !kid.is_empty()) {
            header = header.with_key_id(kid);
        }
        let header = header.encode()?;
        let payload = encode_segment(self.sync()?);

        let mut token = String::with_capacity(header.len() + payload.len() + 2);
        token.push_str(&header);
        token.push('.');
        token.push_str(&payload);
        token.push('.');
        Ok(token)
    }
}

/// Private key of any supported family
///
/// # Example
///
/// ```
/// use signed_jwt::{AlgorithmTable, Claims, EcdsaPrivateKey, SigningKey};
///
/// let key = SigningKey::Ecdsa(EcdsaPrivateKey::generate_p384());
/// assert_eq!(key.default_algorithm(), "ES384");
///
/// let token = key
///     .sign(&mut Claims::new(), "ES384", AlgorithmTable::standard())
///     .unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
#[derive(Clone)]
pub enum SigningKey {
    /// ECDSA key on P-256, P-384 or P-521
    Ecdsa(EcdsaPrivateKey),
    /// Ed25519 key
    EdDsa(ed25519_dalek::SigningKey),
    /// HMAC secret
    Hmac(Vec<u8>),
    /// RSA key
    Rsa(RsaPrivateKey),
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ecdsa(key) => f.debug_tuple("Ecdsa").field(key).finish(),
            Self::EdDsa(_) => f.write_str("EdDsa(..)"),
            Self::Hmac(_) => f.write_str("Hmac(..)"),
            Self::Rsa(_) => f.write_str("Rsa(..)"),
        }
    }
}

impl SigningKey {
    /// The signature family of the key
    pub fn family(&self) -> Family {
        match self {
            Self::Ecdsa(_) => Family::Ecdsa,
            Self::EdDsa(_) => Family::EdDsa,
            Self::Hmac(_) => Family::Hmac,
            Self::Rsa(_) => Family::Rsa,
        }
    }

    /// The algorithm used when none is given
    pub fn default_algorithm(&self) -> &'static str {
        match self {
            Self::Ecdsa(key) => key.default_algorithm(),
            Self::EdDsa(_) => algs::EDDSA,
            Self::Hmac(_) => algs::HS256,
            Self::Rsa(_) => algs::RS256,
        }
    }

    /// The key that verifies this key's signatures
    ///
    /// ```
    /// use signed_jwt::{Key, SigningKey};
    ///
    /// let key = SigningKey::Hmac(b"secret".to_vec());
    /// assert_eq!(key.public_key(), Key::Secret(b"secret".to_vec()));
    /// ```
    pub fn public_key(&self) -> Key {
        match self {
            Self::Ecdsa(key) => Key::Ecdsa(key.public_key()),
            Self::EdDsa(key) => Key::EdDsa(key.verifying_key()),
            Self::Hmac(secret) => Key::Secret(secret.clone()),
            Self::Rsa(key) => Key::Rsa(key.to_public_key()),
        }
    }

    /// Builds and signs a token for `claims` with `alg`.
    ///
    /// `alg` must belong to the key's family, otherwise
    /// [`Error::UnknownAlgorithm`] is returned.
    pub fn sign(
        &self,
        claims: &mut Claims,
        alg: &str,
        table: &AlgorithmTable,
    ) -> Result<String, Error> {
        match self {
            Self::Ecdsa(key) => claims.ecdsa_sign(alg, key, table),
            Self::EdDsa(key) => {
                if alg != algs::EDDSA {
                    return Err(Error::UnknownAlgorithm(alg.to_string()));
                }
                claims.eddsa_sign(key)
            }
            Self::Hmac(secret) => claims.hmac_sign(alg, secret, table),
            Self::Rsa(key) => claims.rsa_sign(alg, key, table),
        }
    }

    /// Imports the first private key of a PEM document.
    ///
    /// Accepts `PRIVATE KEY` (PKCS #8) for every asymmetric family,
    /// `RSA PRIVATE KEY` (PKCS #1) and `EC PRIVATE KEY` (SEC1).
    /// Encrypted keys are not supported.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, Error> {
        let blocks =
            pem::parse_many(pem).map_err(|e| Error::InvalidKey(format!("PEM: {e}")))?;
        let block = blocks
            .first()
            .ok_or_else(|| Error::InvalidKey("no PEM block found".to_string()))?;
        Self::from_der(block.tag(), block.contents())
    }

    pub(crate) fn from_der(label: &str, der: &[u8]) -> Result<Self, Error> {
        match label {
            "PRIVATE KEY" => {
                if let Ok(key) = ed25519_dalek::SigningKey::from_pkcs8_der(der) {
                    return Ok(Self::EdDsa(key));
                }
                if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
                    return Ok(Self::Ecdsa(EcdsaPrivateKey::P256(key)));
                }
                if let Ok(key) = p384::ecdsa::SigningKey::from_pkcs8_der(der) {
                    return Ok(Self::Ecdsa(EcdsaPrivateKey::P384(key)));
                }
                if let Ok(key) = p521::SecretKey::from_pkcs8_der(der) {
                    return p521_signing_key(&key);
                }
                RsaPrivateKey::from_pkcs8_der(der)
                    .map(Self::Rsa)
                    .map_err(|e| Error::InvalidKey(format!("PKCS #8: {e}")))
            }
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(der)
                .map(Self::Rsa)
                .map_err(|e| Error::InvalidKey(format!("PKCS #1: {e}"))),
            "EC PRIVATE KEY" => {
                if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
                    return Ok(Self::Ecdsa(EcdsaPrivateKey::P256(key.into())));
                }
                if let Ok(key) = p384::SecretKey::from_sec1_der(der) {
                    return Ok(Self::Ecdsa(EcdsaPrivateKey::P384(key.into())));
                }
                let key = p521::SecretKey::from_sec1_der(der)
                    .map_err(|e| Error::InvalidKey(format!("SEC1: {e}")))?;
                p521_signing_key(&key)
            }
            other => Err(Error::UnknownPemType(other.to_string())),
        }
    }
}

fn p521_signing_key(key: &p521::SecretKey) -> Result<SigningKey, Error> {
    p521::ecdsa::SigningKey::from_bytes(&key.to_bytes())
        .map(|key| SigningKey::Ecdsa(EcdsaPrivateKey::P521(key)))
        .map_err(|e| Error::InvalidKey(format!("P-521: {e}")))
}

/// Builder for creating tokens
///
/// # Example
///
/// ```
/// use signed_jwt::{AlgorithmTable, Claims, RegisteredClaims, SigningKey, TokenBuilder};
/// use serde_json::json;
///
/// let key = SigningKey::Hmac(b"my-secret-key".to_vec());
/// let token = TokenBuilder::new()
///     .algorithm("HS384")
///     .key_id("hmac-2024")
///     .registered_claims(RegisteredClaims::new().with_issuer("example-issuer"))
///     .claim("role", json!("admin"))
///     .expires_in_secs(3600)
///     .sign(&key, AlgorithmTable::standard())
///     .unwrap();
///
/// let claims =
///     Claims::hmac_check(token.as_bytes(), b"my-secret-key", AlgorithmTable::standard()).unwrap();
/// assert_eq!(claims.key_id.as_deref(), Some("hmac-2024"));
/// assert_eq!(claims.string("role"), Some("admin"));
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    alg: Option<String>,
    claims: Claims,
}

impl TokenBuilder {
    /// Create a new token builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the algorithm; defaults to the signing key's standard algorithm
    pub fn algorithm<S: Into<String>>(mut self, alg: S) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// Set the key identifier in the header
    pub fn key_id<S: Into<String>>(mut self, kid: S) -> Self {
        self.claims.key_id = Some(kid.into());
        self
    }

    /// Set the registered claims
    pub fn registered_claims(mut self, claims: RegisteredClaims) -> Self {
        self.claims.registered = claims;
        self
    }

    /// Add a custom claim
    pub fn claim<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.claims.custom.insert(name.into(), value);
        self
    }

    /// Set expiration time relative to now (in seconds)
    pub fn expires_in_secs(mut self, seconds: u64) -> Self {
        let exp = current_timestamp().saturating_add(seconds);
        self.claims.registered.exp = Some(NumericTime::from_secs(exp));
        self
    }

    /// Set expiration time relative to now using a Duration
    pub fn expires_in(self, duration: std::time::Duration) -> Self {
        self.expires_in_secs(duration.as_secs())
    }

    /// Set token lifetime with issued-at and expiration claims
    ///
    /// The issued-at is set to the current time, and the expiration to the
    /// current time plus `seconds`.
    ///
    /// # Example
    ///
    /// ```
    /// use signed_jwt::TokenBuilder;
    ///
    /// let claims = TokenBuilder::new().valid_for_secs(60).build();
    /// let iat = claims.registered.iat.unwrap().as_secs_f64();
    /// let exp = claims.registered.exp.unwrap().as_secs_f64();
    /// assert_eq!(exp - iat, 60.0);
    /// ```
    pub fn valid_for_secs(mut self, seconds: u64) -> Self {
        let now = current_timestamp();
        self.claims.registered.iat = Some(NumericTime::from_secs(now));
        self.claims.registered.exp = Some(NumericTime::from_secs(now.saturating_add(seconds)));
        self
    }

    /// Set token lifetime with issued-at and expiration claims using a Duration
    pub fn valid_for(self, duration: std::time::Duration) -> Self {
        self.valid_for_secs(duration.as_secs())
    }

    /// The claims collected so far, unsigned
    pub fn build(self) -> Claims {
        self.claims
    }

    /// Build and sign the token
    pub fn sign(self, key: &SigningKey, table: &AlgorithmTable) -> Result<String, Error> {
        let alg = self
            .alg
            .unwrap_or_else(|| key.default_algorithm().to_string());
        let mut claims = self.claims;
        key.sign(&mut claims, &alg, table)
    }
}
