//! # HTTP boundary
//!
//! Helpers to authorize requests with bearer tokens over the [`http`] crate
//! types:
//!
//! - [`bearer_token`] extracts the token from the `Authorization` header.
//! - [`Challenge`] renders the `WWW-Authenticate` response for a rejection.
//! - [`Gate`] verifies the token's signature and claims, then copies selected
//!   claims into request headers for the application behind it.

use crate::algorithm::AlgorithmTable;
use crate::claims::{Claims, NumericTime, VerificationOptions, MAX_EXACT_INTEGER};
use crate::error::Error;
use crate::register::KeyRegister;
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Extracts the bearer token from the `Authorization` header.
///
/// The scheme name is matched case-insensitively.
///
/// ```
/// use http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
/// use signed_jwt::web::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def.ghi"));
/// assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Why a request was not authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    /// No bearer token in the request
    Missing,
    /// The token was rejected, with the reason
    InvalidToken(String),
}

impl From<Error> for Challenge {
    fn from(err: Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}

impl Challenge {
    /// The `WWW-Authenticate` header value
    ///
    /// ```
    /// use signed_jwt::{web::Challenge, Error};
    ///
    /// assert_eq!(Challenge::Missing.header_value(), "Bearer");
    /// assert_eq!(
    ///     Challenge::from(Error::Expired).header_value(),
    ///     format!(r#"Bearer error="invalid_token", error_description="{}""#, Error::Expired)
    /// );
    /// ```
    pub fn header_value(&self) -> String {
        match self {
            Self::Missing => "Bearer".to_string(),
            Self::InvalidToken(description) => format!(
                r#"Bearer error="invalid_token", error_description="{}""#,
                quote_escape(description)
            ),
        }
    }

    /// A `401 Unauthorized` response carrying the challenge
    pub fn into_response<B: Default>(self) -> Response<B> {
        let mut response = Response::new(B::default());
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        let value = HeaderValue::from_str(&self.header_value())
            .unwrap_or_else(|_| HeaderValue::from_static(r#"Bearer error="invalid_token""#));
        response.headers_mut().insert(WWW_AUTHENTICATE, value);
        response
    }
}

fn quote_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_control() => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Request authorization with a [`KeyRegister`]
///
/// # Example
///
/// ```
/// use http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
/// use signed_jwt::web::Gate;
/// use signed_jwt::{AlgorithmTable, Claims, Key, KeyRegister, NumericTime, RegisteredClaims};
///
/// let mut keys = KeyRegister::new();
/// keys.add(Key::Secret(b"secret".to_vec()), None);
/// let gate = Gate::new(keys).project("sub", HeaderName::from_static("x-user"));
///
/// let mut claims = Claims::new()
///     .with_registered_claims(RegisteredClaims::new().with_subject("alice"));
/// let token = claims.hmac_sign("HS256", b"secret", AlgorithmTable::standard()).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
/// headers.insert("x-user", HeaderValue::from_static("mallory"));
///
/// gate.authorize(&mut headers, NumericTime::now()).unwrap();
/// assert_eq!(headers["x-user"], "alice");
/// ```
#[derive(Debug, Clone)]
pub struct Gate {
    keys: KeyRegister,
    table: AlgorithmTable,
    options: VerificationOptions,
    projections: Vec<(String, HeaderName)>,
}

impl Gate {
    /// Create a gate with the standard algorithm table and the default
    /// verification options
    pub fn new(keys: KeyRegister) -> Self {
        Self {
            keys,
            table: AlgorithmTable::standard().clone(),
            options: VerificationOptions::new(),
            projections: Vec::new(),
        }
    }

    /// Set the algorithm table
    pub fn with_table(mut self, table: AlgorithmTable) -> Self {
        self.table = table;
        self
    }

    /// Set the claim verification options
    pub fn with_options(mut self, options: VerificationOptions) -> Self {
        self.options = options;
        self
    }

    /// Copy `claim` into the request header `header` on success
    ///
    /// Tokens without the claim are rejected.
    pub fn project<S: Into<String>>(mut self, claim: S, header: HeaderName) -> Self {
        self.projections.push((claim.into(), header));
        self
    }

    /// Authorizes a request by its headers.
    ///
    /// Client-supplied values of the projected headers are removed first.
    /// Then the signature is checked, then the claims against the options
    /// at `now`, and only then are the projected headers set.
    pub fn authorize(&self, headers: &mut HeaderMap, now: NumericTime) -> Result<Claims, Challenge> {
        for (_, header) in &self.projections {
            headers.remove(header);
        }

        let claims = {
            let token = bearer_token(headers).ok_or(Challenge::Missing)?;
            self.keys.check(token.as_bytes(), &self.table)?
        };
        claims.verify_claims(&self.options, now)?;

        let mut projected = Vec::with_capacity(self.projections.len());
        for (claim, header) in &self.projections {
            let text =
                claim_text(&claims, claim).ok_or_else(|| Error::MissingClaim(claim.clone()))?;
            let value = HeaderValue::from_str(&text)
                .map_err(|_| Error::InvalidClaimValue(claim.clone()))?;
            projected.push((header.clone(), value));
        }
        for (header, value) in projected {
            debug!("Projecting claim into header {}", header);
            headers.insert(header, value);
        }
        Ok(claims)
    }
}

/// Header text of a string, number or boolean claim
fn claim_text(claims: &Claims, name: &str) -> Option<String> {
    if let Some(text) = claims.string(name) {
        return Some(text.to_string());
    }
    if let Some(number) = claims.number(name) {
        if number.fract() == 0.0 && number.abs() <= MAX_EXACT_INTEGER {
            return Some(format!("{}", number as i64));
        }
        return Some(number.to_string());
    }
    match claims.get_claim(name)? {
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
