//! # RSA signatures (RS256/384/512 and PS256/384/512)
//!
//! Identifiers starting with `P` use RSASSA-PSS with a salt as long as the
//! digest; every other identifier uses RSASSA-PKCS1-v1_5. This holds for
//! caller-registered identifiers too.

use crate::algorithm::{AlgorithmTable, Family, Hash};
use crate::claims::Claims;
use crate::error::Error;
use crate::token::Token;
use rand::rngs::OsRng;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

fn is_pss(alg: &str) -> bool {
    alg.starts_with('P')
}

#[cfg(not(feature = "sha1"))]
fn sha1_unavailable() -> Error {
    Error::HashUnavailable("SHA-1".to_string())
}

fn pkcs1v15(hash: Hash) -> Result<Pkcs1v15Sign, Error> {
    match hash {
        #[cfg(feature = "sha1")]
        Hash::Sha1 => Ok(Pkcs1v15Sign::new::<sha1::Sha1>()),
        #[cfg(not(feature = "sha1"))]
        Hash::Sha1 => Err(sha1_unavailable()),
        Hash::Sha256 => Ok(Pkcs1v15Sign::new::<Sha256>()),
        Hash::Sha384 => Ok(Pkcs1v15Sign::new::<Sha384>()),
        Hash::Sha512 => Ok(Pkcs1v15Sign::new::<Sha512>()),
    }
}

fn pss(hash: Hash) -> Result<Pss, Error> {
    match hash {
        #[cfg(feature = "sha1")]
        Hash::Sha1 => Ok(Pss::new::<sha1::Sha1>()),
        #[cfg(not(feature = "sha1"))]
        Hash::Sha1 => Err(sha1_unavailable()),
        Hash::Sha256 => Ok(Pss::new::<Sha256>()),
        Hash::Sha384 => Ok(Pss::new::<Sha384>()),
        Hash::Sha512 => Ok(Pss::new::<Sha512>()),
    }
}

/// Signs `signing_input` with `key`.
pub fn sign(
    signing_input: &[u8],
    alg: &str,
    key: &RsaPrivateKey,
    table: &AlgorithmTable,
) -> Result<Vec<u8>, Error> {
    let hash = table.lookup(Family::Rsa, alg)?;
    sign_with(signing_input, alg, hash, key)
}

pub(crate) fn sign_with(
    signing_input: &[u8],
    alg: &str,
    hash: Hash,
    key: &RsaPrivateKey,
) -> Result<Vec<u8>, Error> {
    let digest = hash.digest(signing_input)?;
    let signed = if is_pss(alg) {
        key.sign_with_rng(&mut OsRng, pss(hash)?, &digest)
    } else {
        key.sign_with_rng(&mut OsRng, pkcs1v15(hash)?, &digest)
    };
    signed.map_err(|e| Error::Signing(format!("RSA: {e}")))
}

/// Verifies `signature` over `signing_input` with `key`.
pub fn verify(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    key: &RsaPublicKey,
    table: &AlgorithmTable,
) -> Result<(), Error> {
    let hash = table.lookup(Family::Rsa, alg)?;
    verify_with(signing_input, signature, alg, hash, key)
}

pub(crate) fn verify_with(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    hash: Hash,
    key: &RsaPublicKey,
) -> Result<(), Error> {
    let digest = hash.digest(signing_input)?;
    let verified = if is_pss(alg) {
        key.verify(pss(hash)?, &digest, signature)
    } else {
        key.verify(pkcs1v15(hash)?, &digest, signature)
    };
    verified.map_err(|_| Error::SignatureMismatch)
}

impl Claims {
    /// Builds and signs a token with RSA.
    pub fn rsa_sign(
        &mut self,
        alg: &str,
        key: &RsaPrivateKey,
        table: &AlgorithmTable,
    ) -> Result<String, Error> {
        let hash = table.lookup(Family::Rsa, alg)?;
        let mut token = self.build(alg)?;
        let signature = sign_with(Token::unsigned_input(&token), alg, hash, key)?;
        Token::append_signature(&mut token, &signature);
        Ok(token)
    }

    /// Parses `token` and verifies its RSA signature with `key`.
    pub fn rsa_check(
        token: &[u8],
        key: &RsaPublicKey,
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
