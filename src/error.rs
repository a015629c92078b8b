//! Error types for the JSON Web Token library

use thiserror::Error;

/// Errors that can occur when issuing or verifying JSON Web Tokens
#[derive(Error, Debug)]
pub enum Error {
    /// Token does not have the three dot-separated segments
    #[error("Incomplete token. Expected header, payload and signature separated by two dots")]
    IncompleteToken,

    /// Header segment is not base64url-encoded JSON
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Payload segment is not base64url-encoded JSON
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Signature segment is not base64url-encoded
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Header carries critical extensions this library does not understand
    #[error("Unsupported critical extension in header: {}", .0.join(", "))]
    UnsupportedCriticalExtension(Vec<String>),

    /// Token uses the "none" algorithm
    #[error("Unsecured token. The \"none\" algorithm is never accepted")]
    Unsecured,

    /// Algorithm identifier is not registered for the family in use
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Algorithm is registered but its hash function is not compiled in
    #[error("Hash function for algorithm {0} is not available in this build")]
    HashUnavailable(String),

    /// Signature verification failed
    #[error("Signature verification failed. No applicable key matches the token's signature")]
    SignatureMismatch,

    /// HMAC secret has zero length
    #[error("Empty secret. HMAC keys must not be empty")]
    EmptySecret,

    /// ECDSA private key curve does not match the algorithm
    #[error("Curve mismatch: algorithm {alg} requires a different curve than {curve}")]
    CurveMismatch {
        /// Requested algorithm identifier
        alg: String,
        /// Curve of the supplied key
        curve: &'static str,
    },

    /// Cryptographic backend failed to produce a signature
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Claim value cannot be represented in JSON
    #[error("Invalid claim value: {0}")]
    InvalidClaimValue(String),

    /// Missing required claim
    #[error("Missing required claim: {0}. The token does not contain a required claim")]
    MissingClaim(String),

    /// Token expired
    #[error("Token expired. The token's expiration time (exp) is in the past")]
    Expired,

    /// Token not yet valid
    #[error("Token not yet valid. The token's not-before time (nbf) is in the future")]
    NotYetValid,

    /// Invalid issuer
    #[error("Invalid issuer. The token's issuer (iss) does not match the expected issuer")]
    InvalidIssuer,

    /// Invalid audience
    #[error("Invalid audience. The token's audience (aud) does not match the expected audience")]
    InvalidAudience,

    /// PEM block type is not a supported key encoding
    #[error("Unknown PEM type: {0}")]
    UnknownPemType(String),

    /// Key type or curve is not supported
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Key material is malformed or not a valid point on its curve
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Encrypted key could not be decrypted, or the password expectation
    /// does not match the PEM blocks
    #[error("Key decryption failed: {0}")]
    KeyDecryption(String),
}

impl Error {
    /// Whether the error was caused by the presented token rather than by
    /// the local key or algorithm configuration.
    ///
    /// ```
    /// use signed_jwt::Error;
    ///
    /// assert!(Error::SignatureMismatch.is_client_error());
    /// assert!(!Error::HashUnavailable("HS1".to_string()).is_client_error());
    /// ```
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Error::HashUnavailable(_)
                | Error::EmptySecret
                | Error::CurveMismatch { .. }
                | Error::Signing(_)
                | Error::UnknownPemType(_)
                | Error::UnsupportedKeyType(_)
                | Error::InvalidKey(_)
                | Error::KeyDecryption(_)
        )
    }
}
