//! # ECDSA signatures (ES256, ES384, ES512)
//!
//! The signing input is hashed with the function the algorithm table selects
//! and signed on the key's curve. Signatures are the fixed-width big-endian
//! concatenation `r ‖ s`, each half as wide as the curve's field.

use crate::algorithm::{AlgorithmTable, Family, Hash};
use crate::claims::Claims;
use crate::constants::algs;
use crate::error::Error;
use crate::token::Token;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;

/// ECDSA private key on one of the NIST curves.
#[derive(Clone)]
pub enum EcdsaPrivateKey {
    /// P-256, for ES256
    P256(p256::ecdsa::SigningKey),
    /// P-384, for ES384
    P384(p384::ecdsa::SigningKey),
    /// P-521, for ES512
    P521(p521::ecdsa::SigningKey),
}

/// ECDSA public key on one of the NIST curves.
#[derive(Clone)]
pub enum EcdsaPublicKey {
    /// P-256, for ES256
    P256(p256::ecdsa::VerifyingKey),
    /// P-384, for ES384
    P384(p384::ecdsa::VerifyingKey),
    /// P-521, for ES512
    P521(p521::ecdsa::VerifyingKey),
}

impl std::fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EcdsaPrivateKey").field(&self.curve()).finish()
    }
}

impl std::fmt::Debug for EcdsaPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EcdsaPublicKey").field(&self.curve()).finish()
    }
}

impl PartialEq for EcdsaPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_sec1_bytes() == other.to_sec1_bytes()
    }
}

impl Eq for EcdsaPublicKey {}

impl EcdsaPrivateKey {
    /// Generates a P-256 key
    pub fn generate_p256() -> Self {
        Self::P256(p256::ecdsa::SigningKey::random(&mut OsRng))
    }

    /// Generates a P-384 key
    pub fn generate_p384() -> Self {
        Self::P384(p384::ecdsa::SigningKey::random(&mut OsRng))
    }

    /// Generates a P-521 key
    pub fn generate_p521() -> Self {
        Self::P521(p521::ecdsa::SigningKey::random(&mut OsRng))
    }

    /// Curve name as used in JWK `crv`
    pub fn curve(&self) -> &'static str {
        match self {
            Self::P256(_) => "P-256",
            Self::P384(_) => "P-384",
            Self::P521(_) => "P-521",
        }
    }

    /// The standard algorithm for the key's curve
    pub fn default_algorithm(&self) -> &'static str {
        match self {
            Self::P256(_) => algs::ES256,
            Self::P384(_) => algs::ES384,
            Self::P521(_) => algs::ES512,
        }
    }

    /// The matching public key
    pub fn public_key(&self) -> EcdsaPublicKey {
        match self {
            Self::P256(key) => EcdsaPublicKey::P256(p256::ecdsa::VerifyingKey::from(key)),
            Self::P384(key) => EcdsaPublicKey::P384(p384::ecdsa::VerifyingKey::from(key)),
            Self::P521(key) => EcdsaPublicKey::P521(p521::ecdsa::VerifyingKey::from(key)),
        }
    }
}

impl EcdsaPublicKey {
    /// Curve name as used in JWK `crv`
    pub fn curve(&self) -> &'static str {
        match self {
            Self::P256(_) => "P-256",
            Self::P384(_) => "P-384",
            Self::P521(_) => "P-521",
        }
    }

    /// Parses an uncompressed or compressed SEC1 point on the named curve.
    pub fn from_sec1_bytes(curve: &str, point: &[u8]) -> Result<Self, Error> {
        let not_on_curve = |_| Error::InvalidKey(format!("{curve} point is not on the curve"));
        match curve {
            "P-256" => p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(Self::P256)
                .map_err(not_on_curve),
            "P-384" => p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(Self::P384)
                .map_err(not_on_curve),
            "P-521" => p521::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(Self::P521)
                .map_err(not_on_curve),
            other => Err(Error::UnsupportedKeyType(format!("EC curve {other}"))),
        }
    }

    /// Uncompressed SEC1 encoding of the point
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        match self {
            Self::P256(key) => key.to_encoded_point(false).as_bytes().to_vec(),
            Self::P384(key) => key.to_encoded_point(false).as_bytes().to_vec(),
            Self::P521(key) => key.to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    /// Byte width of a signature on this curve
    pub fn signature_size(&self) -> usize {
        match self {
            Self::P256(_) => 64,
            Self::P384(_) => 96,
            Self::P521(_) => 132,
        }
    }
}

/// The curve the standard identifiers are bound to; `None` for custom ones.
fn required_curve(alg: &str) -> Option<&'static str> {
    match alg {
        algs::ES256 => Some("P-256"),
        algs::ES384 => Some("P-384"),
        algs::ES512 => Some("P-521"),
        _ => None,
    }
}

/// Signs `signing_input` with `key`.
///
/// Standard identifiers must be paired with their curve, otherwise
/// [`Error::CurveMismatch`] is returned.
pub fn sign(
    signing_input: &[u8],
    alg: &str,
    key: &EcdsaPrivateKey,
    table: &AlgorithmTable,
) -> Result<Vec<u8>, Error> {
    let hash = table.lookup(Family::Ecdsa, alg)?;
    sign_with(signing_input, alg, hash, key)
}

pub(crate) fn sign_with(
    signing_input: &[u8],
    alg: &str,
    hash: Hash,
    key: &EcdsaPrivateKey,
) -> Result<Vec<u8>, Error> {
    if let Some(curve) = required_curve(alg) {
        if curve != key.curve() {
            return Err(Error::CurveMismatch {
                alg: alg.to_string(),
                curve: key.curve(),
            });
        }
    }

    let digest = hash.digest(signing_input)?;
    let failed = |e: p256::ecdsa::Error| Error::Signing(format!("ECDSA: {e}"));
    let signature = match key {
        EcdsaPrivateKey::P256(key) => {
            let sig: p256::ecdsa::Signature = key.sign_prehash(&digest).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
        EcdsaPrivateKey::P384(key) => {
            let sig: p384::ecdsa::Signature = key.sign_prehash(&digest).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
        EcdsaPrivateKey::P521(key) => {
            let sig: p521::ecdsa::Signature = key.sign_prehash(&digest).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
    };
    Ok(signature)
}

/// Verifies `signature` over `signing_input` with `key`.
pub fn verify(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    key: &EcdsaPublicKey,
    table: &AlgorithmTable,
) -> Result<(), Error> {
    let hash = table.lookup(Family::Ecdsa, alg)?;
    verify_with(signing_input, signature, alg, hash, key)
}

pub(crate) fn verify_with(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    hash: Hash,
    key: &EcdsaPublicKey,
) -> Result<(), Error> {
    if required_curve(alg).is_some_and(|curve| curve != key.curve()) {
        return Err(Error::SignatureMismatch);
    }
    if signature.len() != key.signature_size() {
        return Err(Error::SignatureMismatch);
    }

    let digest = hash.digest(signing_input)?;
    let verified = match key {
        EcdsaPublicKey::P256(key) => p256::ecdsa::Signature::from_slice(signature)
            .and_then(|sig| key.verify_prehash(&digest, &sig)),
        EcdsaPublicKey::P384(key) => p384::ecdsa::Signature::from_slice(signature)
            .and_then(|sig| key.verify_prehash(&digest, &sig)),
        EcdsaPublicKey::P521(key) => p521::ecdsa::Signature::from_slice(signature)
            .and_then(|sig| key.verify_prehash(&digest, &sig)),
    };
    verified.map_err(|_| Error::SignatureMismatch)
}

impl Claims {
    /// Builds and signs a token with ECDSA.
    ///
    /// ```
    /// use signed_jwt::{AlgorithmTable, Claims, EcdsaPrivateKey, RegisteredClaims};
    ///
    /// let key = EcdsaPrivateKey::generate_p256();
    /// let mut claims = Claims::new()
    ///     .with_registered_claims(RegisteredClaims::new().with_subject("alice"));
    /// let token = claims.ecdsa_sign("ES256", &key, AlgorithmTable::standard()).unwrap();
    ///
    /// let verified =
    ///     Claims::ecdsa_check(token.as_bytes(), &key.public_key(), AlgorithmTable::standard())
    ///         .unwrap();
    /// assert_eq!(verified.registered.sub.as_deref(), Some("alice"));
    /// ```
    pub fn ecdsa_sign(
        &mut self,
        alg: &str,
        key: &EcdsaPrivateKey,
        table: &AlgorithmTable,
    ) -> Result<String, Error> {
        let hash = table.lookup(Family::Ecdsa, alg)?;
        let mut token = self.build(alg)?;
        let signature = sign_with(Token::unsigned_input(&token), alg, hash, key)?;
        Token::append_signature(&mut token, &signature);
        Ok(token)
    }

    /// Parses `token` and verifies its ECDSA signature with `key`.
    pub fn ecdsa_check(
        token: &[u8],
        key: &EcdsaPublicKey,
        table: &AlgorithmTable,
    ) -> Result<Claims, Error> {
        let token = Token::scan(token)?;
        verify(
            token.signing_input(),
            &token.signature,
            &token.header.alg,
            key,
            table,
        )?;
        Ok(token.into_claims())
    }
}
