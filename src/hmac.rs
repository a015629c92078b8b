//! # HMAC message authentication (HS256, HS384, HS512)
//!
//! MACs are compared in constant time. An empty secret is a configuration
//! error and is rejected before any hashing.

use crate::algorithm::{AlgorithmTable, Family, Hash};
use crate::claims::Claims;
use crate::error::Error;
use crate::token::Token;
use crate::utils::verify_mac;

/// Computes the MAC of `data` under `secret`.
pub fn mac(hash: Hash, secret: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }
    let mac = match hash {
        #[cfg(feature = "sha1")]
        Hash::Sha1 => {
            use hmac::Mac;
            let mut mac = hmac::Hmac::<sha1::Sha1>::new_from_slice(secret)
                .map_err(|_| Error::EmptySecret)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        #[cfg(not(feature = "sha1"))]
        Hash::Sha1 => return Err(Error::HashUnavailable("SHA-1".to_string())),
        Hash::Sha256 => hmac_sha256::HMAC::mac(data, secret).to_vec(),
        Hash::Sha384 => hmac_sha512::sha384::HMAC::mac(data, secret).to_vec(),
        Hash::Sha512 => hmac_sha512::HMAC::mac(data, secret).to_vec(),
    };
    Ok(mac)
}

/// Computes the MAC of `signing_input` for algorithm `alg`.
pub fn sign(
    signing_input: &[u8],
    alg: &str,
    secret: &[u8],
    table: &AlgorithmTable,
) -> Result<Vec<u8>, Error> {
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }
    let hash = table.lookup(Family::Hmac, alg)?;
    mac(hash, secret, signing_input)
}

/// Verifies the MAC of `signing_input` in constant time.
pub fn verify(
    signing_input: &[u8],
    signature: &[u8],
    alg: &str,
    secret: &[u8],
    table: &AlgorithmTable,
) -> Result<(), Error> {
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }
    let hash = table.lookup(Family::Hmac, alg)?;
    verify_with(signing_input, signature, hash, secret)
}

pub(crate) fn verify_with(
    signing_input: &[u8],
    signature: &[u8],
    hash: Hash,
    secret: &[u8],
) -> Result<(), Error> {
    let computed = mac(hash, secret, signing_input)?;
    verify_mac(&computed, signature)
}

/// Reusable HMAC signer and verifier for one algorithm and secret.
///
/// The algorithm and secret are validated once, at construction.
///
/// ```
/// use signed_jwt::{AlgorithmTable, Claims, Hmac, RegisteredClaims};
///
/// let hmac = Hmac::new("HS512", b"server-secret".to_vec(), AlgorithmTable::standard()).unwrap();
/// let mut claims = Claims::new()
///     .with_registered_claims(RegisteredClaims::new().with_issuer("auth"));
/// let token = hmac.sign(&mut claims).unwrap();
///
/// let verified = hmac.check(token.as_bytes()).unwrap();
/// assert_eq!(verified.registered.iss.as_deref(), Some("auth"));
/// ```
#[derive(Clone)]
pub struct Hmac {
    alg: String,
    hash: Hash,
    secret: Vec<u8>,
}

impl std::fmt::Debug for Hmac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hmac")
            .field("alg", &self.alg)
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

impl Hmac {
    /// Binds `alg` and `secret`.
    pub fn new<S: Into<String>>(
        alg: S,
        secret: Vec<u8>,
        table: &AlgorithmTable,
    ) -> Result<Self, Error> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        let alg = alg.into();
        let hash = table.lookup(Family::Hmac, &alg)?;
        Ok(Self { alg, hash, secret })
    }

    /// The bound algorithm identifier
    pub fn algorithm(&self) -> &str {
        &self.alg
    }

    /// Builds and signs a token.
    pub fn sign(&self, claims: &mut Claims) -> Result<String, Error> {
        let mut token = claims.build(&self.alg)?;
        let signature = mac(self.hash, &self.secret, Token::unsigned_input(&token))?;
        Token::append_signature(&mut token, &signature);
        Ok(token)
    }

    /// Parses `token` and verifies its MAC.
    ///
    /// Tokens for any other algorithm are rejected with
    /// [`Error::UnknownAlgorithm`].
    pub fn check(&self, token: &[u8]) -> Result<Claims, Error> {
        let token = Token::scan(token)?;
        if token.header.alg != self.alg {
            return Err(Error::UnknownAlgorithm(token.header.alg));
        }
        verify_with(
            token.signing_input(),
            &token.signature,
            self.hash,
            &self.secret,
        )?;
        Ok(token.into_claims())
    }
}

impl Claims {
    /// Builds and signs a token with HMAC.
    pub fn hmac_sign(
        &mut self,
        alg: &str,
        secret: &[u8],
        table: &AlgorithmTable,
    ) -> Result<String, Error> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        let hash = table.lookup(Family::Hmac, alg)?;
        let mut token = self.build(alg)?;
        let signature = mac(hash, secret, Token::unsigned_input(&token))?;
        Token::append_signature(&mut token, &signature);
        Ok(token)
    }

    /// Parses `token` and verifies its MAC with `secret`.
    pub fn hmac_check(
        token: &[u8],
        secret: &[u8],
        table: &AlgorithmTable,
    ) -> Result<Claims, Error> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        let token = Token::scan(token)?;
        verify(
            token.signing_input(),
            &token.signature,
            &token.header.alg,
            secret,
            table,
        )?;
        Ok(token.into_claims())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_sizes() {
        for (hash, size) in [(Hash::Sha256, 32), (Hash::Sha384, 48), (Hash::Sha512, 64)] {
            assert_eq!(mac(hash, b"key", b"data").unwrap().len(), size);
        }
    }

    #[test]
    fn test_rfc4231_case_2() {
        // RFC 4231, Section 4.3
        let expected = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";
        let computed = mac(Hash::Sha256, b"Jefe", b"what do ya want for nothing?").unwrap();
        let hex: String = computed.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, expected);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let table = AlgorithmTable::standard();
        assert!(matches!(sign(b"x.y", "HS256", b"", table), Err(Error::EmptySecret)));
        assert!(matches!(
            verify(b"x.y", b"sig", "HS256", b"", table),
            Err(Error::EmptySecret)
        ));
        assert!(matches!(
            Hmac::new("HS256", Vec::new(), table),
            Err(Error::EmptySecret)
        ));
        assert!(matches!(
            Claims::hmac_check(b"garbage", b"", table),
            Err(Error::EmptySecret)
        ));
    }

    #[test]
    fn test_hmac_bound_to_algorithm() {
        let table = AlgorithmTable::standard();
        let hs256 = Hmac::new("HS256", b"secret".to_vec(), table).unwrap();
        let hs384 = Hmac::new("HS384", b"secret".to_vec(), table).unwrap();
        let token = hs256.sign(&mut Claims::new()).unwrap();
        hs256.check(token.as_bytes()).expect("Failed to verify");
        match hs384.check(token.as_bytes()) {
            Err(Error::UnknownAlgorithm(alg)) => assert_eq!(alg, "HS256"),
            other => panic!("Expected UnknownAlgorithm, got {other:?}"),
        }
        assert!(matches!(
            Hmac::new("RS256", b"secret".to_vec(), table),
            Err(Error::UnknownAlgorithm(_))
        ));
    }

    #[cfg(not(feature = "sha1"))]
    #[test]
    fn test_sha1_unavailable() {
        let table = AlgorithmTable::standard().clone().with_hmac("HS1", Hash::Sha1);
        assert!(matches!(
            Claims::new().hmac_sign("HS1", b"secret", &table),
            Err(Error::HashUnavailable(_))
        ));
    }

    #[cfg(feature = "sha1")]
    #[test]
    fn test_sha1_available() {
        let table = AlgorithmTable::standard().clone().with_hmac("HS1", Hash::Sha1);
        let token = Claims::new().hmac_sign("HS1", b"secret", &table).unwrap();
        Claims::hmac_check(token.as_bytes(), b"secret", &table).expect("Failed to verify");
    }
}
