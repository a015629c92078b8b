//! # Algorithm Table
//!
//! Maps algorithm identifiers to hash functions, with one map per signature
//! family. The table is an immutable value: extending it means building a new
//! table with overrides, so a table shared between threads never changes
//! underneath a verification.
//!
//! ```
//! use signed_jwt::{AlgorithmTable, Family, Hash};
//!
//! let table = AlgorithmTable::standard().clone().with_hmac("HS256-local", Hash::Sha256);
//! assert_eq!(table.lookup(Family::Hmac, "HS256-local").unwrap(), Hash::Sha256);
//! assert!(AlgorithmTable::standard().lookup(Family::Hmac, "HS256-local").is_err());
//! ```

use crate::constants::algs;
use crate::error::Error;
use once_cell::sync::Lazy;
use sha2::Digest;
use std::collections::HashMap;

/// Hash functions selectable by an algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hash {
    /// SHA-1, only available with the `sha1` feature
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl Hash {
    /// Whether the hash implementation is compiled into this binary.
    pub fn available(&self) -> bool {
        match self {
            Hash::Sha1 => cfg!(feature = "sha1"),
            Hash::Sha256 | Hash::Sha384 | Hash::Sha512 => true,
        }
    }

    /// Digest size in bytes
    pub fn size(&self) -> usize {
        match self {
            Hash::Sha1 => 20,
            Hash::Sha256 => 32,
            Hash::Sha384 => 48,
            Hash::Sha512 => 64,
        }
    }

    /// Computes the digest of `data`.
    ///
    /// Callers obtain a `Hash` through [`AlgorithmTable::lookup`], which
    /// rejects unavailable hashes, so the `Sha1` arm only fails when a
    /// `Hash` is used directly.
    pub fn digest(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            #[cfg(feature = "sha1")]
            Hash::Sha1 => Ok(sha1::Sha1::digest(data).to_vec()),
            #[cfg(not(feature = "sha1"))]
            Hash::Sha1 => Err(Error::HashUnavailable("SHA-1".to_string())),
            Hash::Sha256 => Ok(sha2::Sha256::digest(data).to_vec()),
            Hash::Sha384 => Ok(sha2::Sha384::digest(data).to_vec()),
            Hash::Sha512 => Ok(sha2::Sha512::digest(data).to_vec()),
        }
    }
}

/// Signature families. Algorithm identifiers never span two families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Edwards-curve signatures (Ed25519)
    EdDsa,
    /// HMAC message authentication
    Hmac,
    /// RSA PKCS #1 v1.5 and PSS signatures
    Rsa,
    /// Elliptic curve signatures on the NIST curves
    Ecdsa,
}

impl Family {
    /// Families in dispatch order
    pub const ALL: [Family; 4] = [Family::EdDsa, Family::Hmac, Family::Rsa, Family::Ecdsa];

    /// Human-readable family name
    pub fn name(&self) -> &'static str {
        match self {
            Family::EdDsa => "EdDSA",
            Family::Hmac => "HMAC",
            Family::Rsa => "RSA",
            Family::Ecdsa => "ECDSA",
        }
    }
}

static STANDARD: Lazy<AlgorithmTable> = Lazy::new(|| {
    let mut table = AlgorithmTable::empty();
    table.ecdsa.insert(algs::ES256.to_string(), Hash::Sha256);
    table.ecdsa.insert(algs::ES384.to_string(), Hash::Sha384);
    table.ecdsa.insert(algs::ES512.to_string(), Hash::Sha512);
    table.hmac.insert(algs::HS256.to_string(), Hash::Sha256);
    table.hmac.insert(algs::HS384.to_string(), Hash::Sha384);
    table.hmac.insert(algs::HS512.to_string(), Hash::Sha512);
    table.rsa.insert(algs::PS256.to_string(), Hash::Sha256);
    table.rsa.insert(algs::PS384.to_string(), Hash::Sha384);
    table.rsa.insert(algs::PS512.to_string(), Hash::Sha512);
    table.rsa.insert(algs::RS256.to_string(), Hash::Sha256);
    table.rsa.insert(algs::RS384.to_string(), Hash::Sha384);
    table.rsa.insert(algs::RS512.to_string(), Hash::Sha512);
    table
});

/// Algorithm identifier to hash function mapping, one map per family.
///
/// EdDSA has no hash selection and is recognised by its fixed identifier
/// `"EdDSA"` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmTable {
    ecdsa: HashMap<String, Hash>,
    hmac: HashMap<String, Hash>,
    rsa: HashMap<String, Hash>,
}

impl Default for AlgorithmTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

impl AlgorithmTable {
    /// A table without any algorithms
    pub fn empty() -> Self {
        Self {
            ecdsa: HashMap::new(),
            hmac: HashMap::new(),
            rsa: HashMap::new(),
        }
    }

    /// The process-wide table with the RFC 7518 identifiers.
    pub fn standard() -> &'static AlgorithmTable {
        &STANDARD
    }

    /// Returns a table with `alg` mapped to `hash` for ECDSA
    pub fn with_ecdsa<S: Into<String>>(mut self, alg: S, hash: Hash) -> Self {
        self.ecdsa.insert(alg.into(), hash);
        self
    }

    /// Returns a table with `alg` mapped to `hash` for HMAC
    pub fn with_hmac<S: Into<String>>(mut self, alg: S, hash: Hash) -> Self {
        self.hmac.insert(alg.into(), hash);
        self
    }

    /// Returns a table with `alg` mapped to `hash` for RSA.
    ///
    /// Identifiers starting with `P` select PSS, all others PKCS #1 v1.5.
    pub fn with_rsa<S: Into<String>>(mut self, alg: S, hash: Hash) -> Self {
        self.rsa.insert(alg.into(), hash);
        self
    }

    /// Resolves the hash for `alg` within `family`.
    ///
    /// Fails with [`Error::UnknownAlgorithm`] when the family does not know
    /// the identifier, and with [`Error::HashUnavailable`] when it does but
    /// the hash is not compiled in.
    pub fn lookup(&self, family: Family, alg: &str) -> Result<Hash, Error> {
        let map = match family {
            Family::Ecdsa => &self.ecdsa,
            Family::Hmac => &self.hmac,
            Family::Rsa => &self.rsa,
            Family::EdDsa => return Err(Error::UnknownAlgorithm(alg.to_string())),
        };

        let hash = map
            .get(alg)
            .copied()
            .ok_or_else(|| Error::UnknownAlgorithm(alg.to_string()))?;
        if !hash.available() {
            return Err(Error::HashUnavailable(alg.to_string()));
        }
        Ok(hash)
    }

    /// The family `alg` belongs to, if any.
    pub fn family(&self, alg: &str) -> Option<Family> {
        if alg == algs::EDDSA {
            return Some(Family::EdDsa);
        }
        if self.hmac.contains_key(alg) {
            Some(Family::Hmac)
        } else if self.rsa.contains_key(alg) {
            Some(Family::Rsa)
        } else if self.ecdsa.contains_key(alg) {
            Some(Family::Ecdsa)
        } else {
            None
        }
    }
}
