//! # Claims for JSON Web Tokens
//!
//! This module provides the claims structure and related types for JSON Web Tokens.
//!
//! Claims are divided into two categories:
//!
//! - **Registered Claims**: Standard claims defined in RFC 7519, such as issuer, subject, audience, and expiration time.
//! - **Custom Claims**: Application-specific claims that can contain any JSON value.
//!
//! When a token is parsed, registered claims with the expected JSON type are
//! moved out of the custom map into [`RegisteredClaims`]. When a token is
//! built, the registered claims are written over any custom entry with the
//! same name, so a structurally typed field always wins.

use crate::constants::claim_names;
use crate::error::Error;
use serde_json::{Map, Number, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Type alias for the custom claims map
pub type ClaimsMap = Map<String, Value>;

/// Largest integer an `f64` holds exactly
pub(crate) const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Seconds since the Unix epoch, as carried by `exp`, `nbf` and `iat`.
///
/// Sub-second precision is permitted. [`NumericTime::from`] a `SystemTime`
/// rounds to whole seconds, which is what most implementations expect.
///
/// ```
/// use signed_jwt::NumericTime;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = NumericTime::from(UNIX_EPOCH + Duration::from_millis(1_600));
/// assert_eq!(t.as_secs_f64(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct NumericTime(f64);

impl NumericTime {
    /// Creates a time from fractional seconds since the epoch
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    /// Creates a time from whole seconds since the epoch
    pub fn from_secs(secs: u64) -> Self {
        Self(secs as f64)
    }

    /// Current time, rounded to seconds
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Seconds since the epoch
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }

    /// Converts to a `SystemTime`; `None` when out of range or not finite
    pub fn to_system_time(&self) -> Option<SystemTime> {
        if !self.0.is_finite() {
            return None;
        }
        if self.0 >= 0.0 {
            UNIX_EPOCH.checked_add(Duration::try_from_secs_f64(self.0).ok()?)
        } else {
            UNIX_EPOCH.checked_sub(Duration::try_from_secs_f64(-self.0).ok()?)
        }
    }

    fn to_json(self) -> Result<Value, Error> {
        if !self.0.is_finite() {
            return Err(Error::InvalidClaimValue(format!(
                "timestamp {} is not a finite number",
                self.0
            )));
        }
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INTEGER {
            return Ok(Value::Number(Number::from(self.0 as i64)));
        }
        Number::from_f64(self.0)
            .map(Value::Number)
            .ok_or_else(|| Error::InvalidClaimValue(format!("timestamp {}", self.0)))
    }
}

impl From<SystemTime> for NumericTime {
    fn from(t: SystemTime) -> Self {
        let secs = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        };
        Self(secs.round())
    }
}

/// Standard registered claims as defined in RFC 7519.
///
/// These claims are standardized and have well-defined meanings:
///
/// - **iss** (Issuer): Identifies the principal that issued the token.
/// - **sub** (Subject): Identifies the principal that is the subject of the token.
/// - **aud** (Audience): Identifies the recipients that the token is intended for.
/// - **exp** (Expiration Time): Identifies the expiration time on or after which the token MUST NOT be accepted.
/// - **nbf** (Not Before): Identifies the time before which the token MUST NOT be accepted.
/// - **iat** (Issued At): Identifies the time at which the token was issued.
/// - **jti** (JWT ID): Provides a unique identifier for the token.
///
/// # Example
///
/// ```
/// use signed_jwt::{NumericTime, RegisteredClaims};
///
/// let claims = RegisteredClaims::new()
///     .with_issuer("example-issuer")
///     .with_subject("user-123")
///     .with_audience("example-service")
///     .with_expiration(NumericTime::from_secs(1_700_003_600));
///
/// assert_eq!(claims.iss.as_deref(), Some("example-issuer"));
/// assert_eq!(claims.aud, vec!["example-service".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisteredClaims {
    /// Issuer - identifies the principal that issued the token
    pub iss: Option<String>,
    /// Subject - identifies the principal that is the subject of the token
    pub sub: Option<String>,
    /// Audiences - a single audience is emitted as a JSON string
    pub aud: Vec<String>,
    /// Expiration time - token must not be accepted at or after this time
    pub exp: Option<NumericTime>,
    /// Not before - token must not be accepted before this time
    pub nbf: Option<NumericTime>,
    /// Issued at - when the token was issued
    pub iat: Option<NumericTime>,
    /// JWT ID - unique identifier for the token
    pub jti: Option<String>,
}

impl RegisteredClaims {
    /// Creates a new empty set of registered claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the issuer claim.
    pub fn with_issuer<S: Into<String>>(mut self, iss: S) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Sets the subject claim.
    pub fn with_subject<S: Into<String>>(mut self, sub: S) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Adds an audience.
    pub fn with_audience<S: Into<String>>(mut self, aud: S) -> Self {
        self.aud.push(aud.into());
        self
    }

    /// Sets the expiration time claim.
    pub fn with_expiration(mut self, exp: NumericTime) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Sets the not before claim.
    pub fn with_not_before(mut self, nbf: NumericTime) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Sets the issued at claim.
    pub fn with_issued_at(mut self, iat: NumericTime) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Sets the JWT ID claim.
    pub fn with_jti<S: Into<String>>(mut self, jti: S) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set token lifetime with issued-at, not-before, and expiration claims
    ///
    /// This is a convenience method that sets all three time-related claims:
    /// - `iat` (issued at) is set to the current time
    /// - `nbf` (not before) is set to the current time
    /// - `exp` (expiration) is set to current time plus the specified seconds
    pub fn with_lifetime_secs(mut self, seconds: u64) -> Self {
        let now = crate::utils::current_timestamp();
        self.iat = Some(NumericTime::from_secs(now));
        self.nbf = Some(NumericTime::from_secs(now));
        self.exp = Some(NumericTime::from_secs(now.saturating_add(seconds)));
        self
    }

    /// Projects the claims that are set onto a JSON map.
    pub fn to_map(&self) -> Result<ClaimsMap, Error> {
        let mut map = ClaimsMap::new();

        if let Some(iss) = &self.iss {
            map.insert(claim_names::ISS.to_string(), Value::String(iss.clone()));
        }

        if let Some(sub) = &self.sub {
            map.insert(claim_names::SUB.to_string(), Value::String(sub.clone()));
        }

        match self.aud.as_slice() {
            [] => {}
            [single] => {
                map.insert(claim_names::AUD.to_string(), Value::String(single.clone()));
            }
            many => {
                let list = many.iter().cloned().map(Value::String).collect();
                map.insert(claim_names::AUD.to_string(), Value::Array(list));
            }
        }

        if let Some(exp) = self.exp {
            map.insert(claim_names::EXP.to_string(), exp.to_json()?);
        }

        if let Some(nbf) = self.nbf {
            map.insert(claim_names::NBF.to_string(), nbf.to_json()?);
        }

        if let Some(iat) = self.iat {
            map.insert(claim_names::IAT.to_string(), iat.to_json()?);
        }

        if let Some(jti) = &self.jti {
            map.insert(claim_names::JTI.to_string(), Value::String(jti.clone()));
        }

        Ok(map)
    }

    /// Moves registered claims out of `map`.
    ///
    /// Entries whose JSON type does not match the registered claim stay in
    /// the map untouched.
    pub fn take_from(map: &mut ClaimsMap) -> Self {
        Self {
            iss: take_string(map, claim_names::ISS),
            sub: take_string(map, claim_names::SUB),
            aud: take_audiences(map),
            exp: take_time(map, claim_names::EXP),
            nbf: take_time(map, claim_names::NBF),
            iat: take_time(map, claim_names::IAT),
            jti: take_string(map, claim_names::JTI),
        }
    }
}

fn take_string(map: &mut ClaimsMap, name: &str) -> Option<String> {
    match map.get(name) {
        Some(Value::String(_)) => match map.remove(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

fn take_time(map: &mut ClaimsMap, name: &str) -> Option<NumericTime> {
    let secs = map.get(name).and_then(Value::as_f64)?;
    map.remove(name);
    Some(NumericTime(secs))
}

fn take_audiences(map: &mut ClaimsMap) -> Vec<String> {
    let audiences = match map.get(claim_names::AUD) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            match strings {
                Some(strings) => strings,
                None => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };
    map.remove(claim_names::AUD);
    audiences
}

/// Claims of a token: registered fields, custom JSON claims, and the exact
/// JSON bytes of the last serialization.
///
/// # Example
///
/// ```
/// use signed_jwt::{Claims, RegisteredClaims};
/// use serde_json::json;
///
/// let mut claims = Claims::new()
///     .with_registered_claims(RegisteredClaims::new().with_issuer("joe"))
///     .with_claim("admin", json!(true));
///
/// claims.sync().unwrap();
/// assert_eq!(claims.raw(), br#"{"admin":true,"iss":"joe"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    /// Registered claims
    pub registered: RegisteredClaims,
    /// Custom claims, keyed by claim name
    pub custom: ClaimsMap,
    /// Key identifier from the header; not part of the signed claims
    pub key_id: Option<String>,
    raw: Vec<u8>,
}

impl Claims {
    /// Create new empty claims
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registered claims
    pub fn with_registered_claims(mut self, registered: RegisteredClaims) -> Self {
        self.registered = registered;
        self
    }

    /// Add a custom claim
    pub fn with_claim<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.custom.insert(name.into(), value);
        self
    }

    /// Set the key identifier to put in the header
    pub fn with_key_id<S: Into<String>>(mut self, kid: S) -> Self {
        self.key_id = Some(kid.into());
        self
    }

    /// JSON bytes of the last [`Claims::sync`], or of the token payload for
    /// parsed claims.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Serializes the claims into [`Claims::raw`].
    ///
    /// The registered claims are laid over a copy of the custom map, so the
    /// registered value wins when both carry the same name. The custom map
    /// itself is left as is.
    pub fn sync(&mut self) -> Result<&[u8], Error> {
        let mut merged = self.custom.clone();
        for (name, value) in self.registered.to_map()? {
            merged.insert(name, value);
        }
        self.raw = serde_json::to_vec(&merged)
            .map_err(|e| Error::InvalidClaimValue(format!("JSON encoding failed: {e}")))?;
        Ok(&self.raw)
    }

    /// Parses a decoded token payload.
    pub fn from_payload(json: &[u8]) -> Result<Self, Error> {
        let mut custom: ClaimsMap = serde_json::from_slice(json)
            .map_err(|e| Error::MalformedPayload(format!("invalid JSON: {e}")))?;
        let registered = RegisteredClaims::take_from(&mut custom);
        Ok(Self {
            registered,
            custom,
            key_id: None,
            raw: json.to_vec(),
        })
    }

    /// Gets a string claim, registered or custom.
    ///
    /// A single audience counts as a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        let registered = match name {
            claim_names::ISS => self.registered.iss.as_deref(),
            claim_names::SUB => self.registered.sub.as_deref(),
            claim_names::JTI => self.registered.jti.as_deref(),
            claim_names::AUD if self.registered.aud.len() == 1 => {
                Some(self.registered.aud[0].as_str())
            }
            _ => None,
        };
        registered.or_else(|| self.custom.get(name).and_then(Value::as_str))
    }

    /// Gets a numeric claim, registered or custom.
    pub fn number(&self, name: &str) -> Option<f64> {
        let registered = match name {
            claim_names::EXP => self.registered.exp,
            claim_names::NBF => self.registered.nbf,
            claim_names::IAT => self.registered.iat,
            _ => None,
        };
        registered
            .map(|t| t.as_secs_f64())
            .or_else(|| self.custom.get(name).and_then(Value::as_f64))
    }

    /// Get a custom claim
    pub fn get_claim(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }

    /// Check if a custom claim exists
    pub fn has_claim(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    /// Whether the claims are within their time window at `now`.
    ///
    /// Accepts when there is no expiration or `now` is before it, and there
    /// is no not-before or `now` is at or after it.
    ///
    /// ```
    /// use signed_jwt::{Claims, NumericTime, RegisteredClaims};
    ///
    /// let claims = Claims::new().with_registered_claims(
    ///     RegisteredClaims::new().with_expiration(NumericTime::from_secs(100)),
    /// );
    /// assert!(claims.valid(NumericTime::from_secs(99)));
    /// assert!(!claims.valid(NumericTime::from_secs(100)));
    /// ```
    pub fn valid(&self, now: NumericTime) -> bool {
        let before_exp = self.registered.exp.map_or(true, |exp| now < exp);
        let after_nbf = self.registered.nbf.map_or(true, |nbf| now >= nbf);
        before_exp && after_nbf
    }

    /// [`Claims::valid`] at the current time
    pub fn valid_now(&self) -> bool {
        self.valid(NumericTime::now())
    }

    /// Check if the claims have expired at the current time
    pub fn is_expired(&self) -> bool {
        self.registered
            .exp
            .is_some_and(|exp| NumericTime::now() >= exp)
    }

    /// Whether `audience` is one of the token's audiences
    pub fn accept_audience(&self, audience: &str) -> bool {
        self.registered.aud.iter().any(|aud| aud == audience)
    }

    /// Verify the claims against `options` at `now`
    pub fn verify_claims(
        &self,
        options: &VerificationOptions,
        now: NumericTime,
    ) -> Result<(), Error> {
        let leeway = options.leeway as f64;

        // Check expiration
        if options.verify_exp {
            if let Some(exp) = self.registered.exp {
                if now.0 >= exp.0 + leeway {
                    return Err(Error::Expired);
                }
            } else if options.require_exp {
                return Err(Error::MissingClaim(claim_names::EXP.to_string()));
            }
        }

        // Check not before
        if options.verify_nbf {
            if let Some(nbf) = self.registered.nbf {
                if now.0 + leeway < nbf.0 {
                    return Err(Error::NotYetValid);
                }
            }
        }

        // Check issuer
        if let Some(expected_iss) = &options.expected_issuer {
            match &self.registered.iss {
                Some(iss) if iss != expected_iss => return Err(Error::InvalidIssuer),
                None if options.require_iss => {
                    return Err(Error::MissingClaim(claim_names::ISS.to_string()))
                }
                _ => {}
            }
        }

        // Check audience
        if let Some(expected_aud) = &options.expected_audience {
            if self.registered.aud.is_empty() {
                if options.require_aud {
                    return Err(Error::MissingClaim(claim_names::AUD.to_string()));
                }
            } else if !self.accept_audience(expected_aud) {
                return Err(Error::InvalidAudience);
            }
        }

        Ok(())
    }
}

/// Options for claim verification
#[derive(Debug, Clone, Default)]
pub struct VerificationOptions {
    /// Verify expiration claim
    pub verify_exp: bool,
    /// Require expiration claim
    pub require_exp: bool,
    /// Verify not before claim
    pub verify_nbf: bool,
    /// Clock skew tolerance in seconds
    pub leeway: u64,
    /// Expected issuer
    pub expected_issuer: Option<String>,
    /// Require issuer claim
    pub require_iss: bool,
    /// Expected audience
    pub expected_audience: Option<String>,
    /// Require audience claim
    pub require_aud: bool,
}

impl VerificationOptions {
    /// Create new default verification options
    pub fn new() -> Self {
        Self {
            verify_exp: true,
            require_exp: false,
            verify_nbf: true,
            leeway: 0,
            expected_issuer: None,
            require_iss: false,
            expected_audience: None,
            require_aud: false,
        }
    }

    /// Set whether to verify expiration
    pub fn verify_exp(mut self, verify: bool) -> Self {
        self.verify_exp = verify;
        self
    }

    /// Set whether to require expiration
    pub fn require_exp(mut self, require: bool) -> Self {
        self.require_exp = require;
        self
    }

    /// Set whether to verify not before
    pub fn verify_nbf(mut self, verify: bool) -> Self {
        self.verify_nbf = verify;
        self
    }

    /// Set clock skew tolerance in seconds
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Set expected issuer
    pub fn expected_issuer<S: Into<String>>(mut self, issuer: S) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Set whether to require issuer
    pub fn require_iss(mut self, require: bool) -> Self {
        self.require_iss = require;
        self
    }

    /// Set expected audience
    pub fn expected_audience<S: Into<String>>(mut self, audience: S) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Set whether to require audience
    pub fn require_aud(mut self, require: bool) -> Self {
        self.require_aud = require;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_audience_collapses_to_string() {
        let one = RegisteredClaims::new().with_audience("a");
        assert_eq!(one.to_map().unwrap()["aud"], json!("a"));

        let two = RegisteredClaims::new().with_audience("a").with_audience("b");
        assert_eq!(two.to_map().unwrap()["aud"], json!(["a", "b"]));

        assert!(!RegisteredClaims::new().to_map().unwrap().contains_key("aud"));
    }

    #[test]
    fn test_integral_times_stay_integers() {
        let claims = RegisteredClaims::new()
            .with_expiration(NumericTime::from_secs(1_300_819_380))
            .with_issued_at(NumericTime::from_secs_f64(1.5));
        let map = claims.to_map().unwrap();
        assert_eq!(serde_json::to_string(&map["exp"]).unwrap(), "1300819380");
        assert_eq!(serde_json::to_string(&map["iat"]).unwrap(), "1.5");
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut claims = Claims::new().with_registered_claims(
            RegisteredClaims::new().with_not_before(NumericTime::from_secs_f64(f64::NAN)),
        );
        assert!(matches!(claims.sync(), Err(Error::InvalidClaimValue(_))));
    }

    #[test]
    fn test_registered_wins_over_custom() {
        let mut claims = Claims::new()
            .with_registered_claims(RegisteredClaims::new().with_subject("real"))
            .with_claim("sub", json!("forged"));
        let raw = claims.sync().unwrap().to_vec();
        assert_eq!(raw, br#"{"sub":"real"}"#);
        // the custom map is not rewritten
        assert_eq!(claims.custom["sub"], json!("forged"));
    }

    #[test]
    fn test_payload_split() {
        let claims = Claims::from_payload(
            br#"{"iss":"joe","aud":["a","b"],"exp":1300819380,"nbf":"soon","jti":7,"x":null}"#,
        )
        .unwrap();
        assert_eq!(claims.registered.iss.as_deref(), Some("joe"));
        assert_eq!(claims.registered.aud, vec!["a", "b"]);
        assert_eq!(
            claims.registered.exp,
            Some(NumericTime::from_secs(1_300_819_380))
        );
        // mistyped registered claims stay in the custom map
        assert_eq!(claims.registered.nbf, None);
        assert_eq!(claims.custom["nbf"], json!("soon"));
        assert_eq!(claims.registered.jti, None);
        assert_eq!(claims.custom["jti"], json!(7));
        assert!(!claims.has_claim("iss"));
        assert_eq!(claims.get_claim("x"), Some(&Value::Null));
    }

    #[test]
    fn test_mixed_audience_array_stays_custom() {
        let claims = Claims::from_payload(br#"{"aud":["a",1]}"#).unwrap();
        assert!(claims.registered.aud.is_empty());
        assert_eq!(claims.custom["aud"], json!(["a", 1]));
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(matches!(
            Claims::from_payload(b"[1,2]"),
            Err(Error::MalformedPayload(_))
        ));
        assert!(matches!(
            Claims::from_payload(b"{"),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_accessors_prefer_registered() {
        let claims = Claims::from_payload(br#"{"iss":"joe","exp":10,"n":2.5,"s":"v"}"#).unwrap();
        assert_eq!(claims.string("iss"), Some("joe"));
        assert_eq!(claims.string("s"), Some("v"));
        assert_eq!(claims.number("exp"), Some(10.0));
        assert_eq!(claims.number("n"), Some(2.5));
        assert_eq!(claims.number("s"), None);
    }

    #[test]
    fn test_temporal_boundaries() {
        let t = 1_000.0;
        let eps = 0.001;
        let exp = Claims::new().with_registered_claims(
            RegisteredClaims::new().with_expiration(NumericTime::from_secs_f64(t)),
        );
        assert!(!exp.valid(NumericTime::from_secs_f64(t)));
        assert!(exp.valid(NumericTime::from_secs_f64(t - eps)));

        let nbf = Claims::new().with_registered_claims(
            RegisteredClaims::new().with_not_before(NumericTime::from_secs_f64(t)),
        );
        assert!(nbf.valid(NumericTime::from_secs_f64(t)));
        assert!(!nbf.valid(NumericTime::from_secs_f64(t - eps)));
    }

    #[test]
    fn test_no_time_claims_always_valid() {
        let claims = Claims::new();
        assert!(claims.valid(NumericTime::default()));
        assert!(claims.valid(NumericTime::from_secs(u32::MAX as u64)));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_verify_claims_with_leeway() {
        let claims = Claims::new().with_registered_claims(
            RegisteredClaims::new()
                .with_issuer("issuer")
                .with_audience("api")
                .with_expiration(NumericTime::from_secs(100)),
        );
        let now = NumericTime::from_secs(105);

        assert!(matches!(
            claims.verify_claims(&VerificationOptions::new(), now),
            Err(Error::Expired)
        ));
        claims
            .verify_claims(&VerificationOptions::new().leeway(10), now)
            .expect("Leeway should cover the skew");

        let options = VerificationOptions::new()
            .verify_exp(false)
            .expected_issuer("other");
        assert!(matches!(
            claims.verify_claims(&options, now),
            Err(Error::InvalidIssuer)
        ));

        let options = VerificationOptions::new()
            .verify_exp(false)
            .expected_audience("web");
        assert!(matches!(
            claims.verify_claims(&options, now),
            Err(Error::InvalidAudience)
        ));
    }

    #[test]
    fn test_verify_claims_required() {
        let claims = Claims::new();
        let now = NumericTime::from_secs(0);
        let options = VerificationOptions::new().require_exp(true);
        match claims.verify_claims(&options, now) {
            Err(Error::MissingClaim(name)) => assert_eq!(name, "exp"),
            other => panic!("Expected MissingClaim, got {other:?}"),
        }

        let options = VerificationOptions::new()
            .expected_audience("api")
            .require_aud(true);
        assert!(matches!(
            claims.verify_claims(&options, now),
            Err(Error::MissingClaim(_))
        ));

        // without the require flag, absent claims pass
        let options = VerificationOptions::new()
            .expected_issuer("issuer")
            .expected_audience("api");
        claims
            .verify_claims(&options, now)
            .expect("Absent optional claims should pass");
    }

    #[test]
    fn test_lifetime_sets_all_times() {
        let registered = RegisteredClaims::new().with_lifetime_secs(600);
        let iat = registered.iat.expect("Failed to set iat");
        assert_eq!(registered.nbf, Some(iat));
        assert_eq!(
            registered.exp.map(|exp| exp.as_secs_f64() - iat.as_secs_f64()),
            Some(600.0)
        );
    }

    #[test]
    fn test_lifetime_saturates() {
        let registered = RegisteredClaims::new().with_lifetime_secs(u64::MAX);
        assert_eq!(registered.exp, Some(NumericTime::from_secs(u64::MAX)));
    }

    #[test]
    fn test_numeric_time_conversions() {
        let t = NumericTime::from_secs(60);
        assert_eq!(
            t.to_system_time(),
            Some(UNIX_EPOCH + Duration::from_secs(60))
        );
        assert_eq!(NumericTime::from_secs_f64(f64::INFINITY).to_system_time(), None);
        let before_epoch = NumericTime::from(UNIX_EPOCH - Duration::from_secs(5));
        assert_eq!(before_epoch.as_secs_f64(), -5.0);
    }
}
