//! # JOSE Header
//!
//! The first segment of a token. It declares the algorithm used to secure the
//! token and optionally the key that was used:
//!
//! - **Algorithm (alg)**: Specifies the cryptographic algorithm used to secure the token.
//! - **Key ID (kid)**: Identifies the key used to secure the token. It only
//!   steers key selection and carries no other meaning.
//! - **Critical (crit)**: Lists extensions the recipient must understand.
//!   No extensions are supported, so any non-empty list is rejected.

use crate::constants::{algs, encoded_headers};
use crate::error::Error;
use crate::utils::{decode_segment, encode_segment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JOSE header of a token.
///
/// # Example
///
/// ```
/// use signed_jwt::Header;
///
/// let header = Header::new("HS256").with_key_id("my-key-2023");
/// assert_eq!(header.alg, "HS256");
/// assert_eq!(header.kid.as_deref(), Some("my-key-2023"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm identifier
    pub alg: String,
    /// Key identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Critical extensions; entries of any JSON type are read so that a
    /// non-empty list is always reported as unsupported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<Value>>,
}

impl Header {
    /// Creates a header for the given algorithm.
    pub fn new<S: Into<String>>(alg: S) -> Self {
        Self {
            alg: alg.into(),
            kid: None,
            crit: None,
        }
    }

    /// Sets the key identifier.
    pub fn with_key_id<S: Into<String>>(mut self, kid: S) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Gets the key identifier, treating an empty string as absent.
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref().filter(|kid| !kid.is_empty())
    }

    /// Encodes the header as a base64url segment.
    ///
    /// Standard algorithms without a key identifier use a precomputed
    /// encoding, which is byte-identical to the general path.
    ///
    /// ```
    /// use signed_jwt::Header;
    ///
    /// assert_eq!(Header::new("HS256").encode().unwrap(), "eyJhbGciOiJIUzI1NiJ9");
    /// ```
    pub fn encode(&self) -> Result<String, Error> {
        if self.kid.is_none() && self.crit.is_none() {
            if let Some(encoded) = encoded_headers::lookup(&self.alg) {
                return Ok(encoded.to_string());
            }
        }
        self.encode_json()
    }

    fn encode_json(&self) -> Result<String, Error> {
        let json = serde_json::to_vec(self)
            .map_err(|e| Error::MalformedHeader(format!("JSON encoding failed: {e}")))?;
        Ok(encode_segment(&json))
    }

    /// Decodes a header segment and applies the acceptance rules.
    ///
    /// The order of the checks is fixed: encoding, JSON structure, critical
    /// extensions, then the unsecured `"none"` algorithm.
    pub fn decode(segment: &[u8]) -> Result<Self, Error> {
        let json = decode_segment(segment)
            .map_err(|_| Error::MalformedHeader("invalid base64url encoding".to_string()))?;
        let header: Header = serde_json::from_slice(&json)
            .map_err(|e| Error::MalformedHeader(format!("invalid JSON: {e}")))?;

        if let Some(crit) = &header.crit {
            if !crit.is_empty() {
                let names = crit
                    .iter()
                    .map(|entry| match entry {
                        Value::String(name) => name.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                return Err(Error::UnsupportedCriticalExtension(names));
            }
        }

        if header.alg == algs::NONE {
            return Err(Error::Unsecured);
        }

        Ok(header)
    }
}
