//! # EdDSA signatures (Ed25519)
//!
//! Pure Ed25519 signs the signing input itself; there is no pre-hash and the
//! algorithm table is not consulted.

use crate::claims::Claims;
use crate::constants::algs;
use crate::error::Error;
use crate::token::Token;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Signs `signing_input`, producing the raw 64-byte signature.
pub fn sign(signing_input: &[u8], key: &SigningKey) -> Vec<u8> {
    key.sign(signing_input).to_bytes().to_vec()
}

/// Verifies a raw 64-byte Ed25519 signature.
///
/// Any algorithm other than `"EdDSA"` is unknown to this family.
pub fn verify(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    key: &VerifyingKey,
) -> Result<(), Error> {
    if alg != algs::EDDSA {
        return Err(Error::UnknownAlgorithm(alg.to_string()));
    }
    let signature = Signature::from_slice(signature).map_err(|_| Error::SignatureMismatch)?;
    key.verify(signing_input, &signature)
        .map_err(|_| Error::SignatureMismatch)
}

impl Claims {
    /// Builds and signs a token with Ed25519.
    pub fn eddsa_sign(&mut self, key: &SigningKey) -> Result<String, Error> {
        let mut token = self.build(algs::EDDSA)?;
        let signature = sign(Token::unsigned_input(&token), key);
        Token::append_signature(&mut token, &signature);
        Ok(token)
    }

    /// Parses `token` and verifies its Ed25519 signature with `key`.
    pub fn eddsa_check(token: &[u8], key: &VerifyingKey) -> Result<Claims, Error> {
        let token = Token::scan(token)?;
        verify(
            token.signing_input(),
            &token.signature,
            &token.header.alg,
            key,
        )?;
        Ok(token.into_claims())
    }
}
