//! Utility functions for JSON Web Tokens

use crate::error::Error;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};

/// Encode bytes as base64url without padding
pub fn encode_segment(bin: &[u8]) -> String {
    // Encoding into a String only fails on length overflow
    Base64UrlSafeNoPadding::encode_to_string(bin).unwrap_or_default()
}

/// Decode a base64url segment without padding
pub fn decode_segment(segment: &[u8]) -> Result<Vec<u8>, ct_codecs::Error> {
    Base64UrlSafeNoPadding::decode_to_vec(segment, None)
}

/// Constant-time equality of two byte strings
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    ct_codecs::verify(a, b)
}

/// Verify a MAC in constant time
pub fn verify_mac(computed: &[u8], received: &[u8]) -> Result<(), Error> {
    if constant_time_eq(computed, received) {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}

/// Get current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
