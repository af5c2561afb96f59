//! `WWW-Authenticate` challenge parsing.
//!
//! Implements the RFC 7235 `challenge` production closely enough for registry
//! token flows:
//!
//! ```text
//! challenge   = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
//! auth-param  = token BWS "=" BWS ( token / quoted-string )
//! token       = 1*<any CHAR except CTLs or separators>
//! separators  = "(" | ")" | "<" | ">" | "@" | "," | ";" | ":" | "\" | <">
//!             | "/" | "[" | "]" | "?" | "=" | "{" | "}" | SP | HT
//! ```
//!
//! Parsing is lenient: a header without a scheme yields nothing, and a broken
//! parameter list keeps every parameter read before the break.

use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use std::collections::HashMap;

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod challenge_tests;

const IS_TOKEN: u8 = 1 << 0;
const IS_SPACE: u8 = 1 << 1;

const SEPARATORS: &[u8] = b" \t\"(),/:;<=>?@[]\\{}";

/// Byte classes for every octet, computed at compile time.
static OCTET_TYPES: [u8; 256] = octet_types();

const fn octet_types() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut c = 0;
    while c < 256 {
        let b = c as u8;
        let mut class = 0;

        if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
            class |= IS_SPACE;
        }

        let is_ctl = b <= 31 || b == 127;
        let is_char = b <= 127;
        let mut is_separator = false;
        let mut i = 0;
        while i < SEPARATORS.len() {
            if SEPARATORS[i] == b {
                is_separator = true;
            }
            i += 1;
        }
        if is_char && !is_ctl && !is_separator {
            class |= IS_TOKEN;
        }

        table[c] = class;
        c += 1;
    }
    table
}

/// A single challenge from a `WWW-Authenticate` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// The authentication scheme, lowercased (e.g. "bearer")
    pub scheme: String,

    /// Challenge parameters, keys lowercased
    pub parameters: HashMap<String, String>,
}

impl AuthChallenge {
    /// Parses one `WWW-Authenticate` header value.
    ///
    /// Returns `None` when the value does not start with a scheme token.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::AuthChallenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry""#;
    /// let challenge = AuthChallenge::parse(header).unwrap();
    /// assert_eq!(challenge.scheme, "bearer");
    /// assert_eq!(challenge.param("service"), Some("registry"));
    /// ```
    pub fn parse(header: &str) -> Option<Self> {
        Self::parse_bytes(header.as_bytes())
    }

    /// Parses one raw header value.
    pub fn parse_bytes(header: &[u8]) -> Option<Self> {
        let (scheme, rest) = expect_token(header);
        if scheme.is_empty() {
            return None;
        }

        let mut challenge = Self {
            scheme: lossy_lowercase(scheme),
            parameters: HashMap::new(),
        };

        // The first parameter follows the scheme directly; the rest need a comma.
        let mut s = skip_space(rest);
        let mut first = true;
        loop {
            if !first {
                match s.strip_prefix(b",") {
                    Some(after_comma) => s = after_comma,
                    None => break,
                }
            }
            first = false;

            let (key, after_key) = expect_token(skip_space(s));
            if key.is_empty() {
                break;
            }
            let Some(after_eq) = after_key.strip_prefix(b"=") else {
                break;
            };
            let Some((value, after_value)) = expect_token_or_quoted(after_eq) else {
                break;
            };
            if value.is_empty() {
                break;
            }

            challenge
                .parameters
                .insert(lossy_lowercase(key), String::from_utf8_lossy(&value).into_owned());
            s = skip_space(after_value);
        }

        Some(challenge)
    }

    /// Returns a parameter by its lowercase name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Returns true for the `bearer` scheme.
    pub fn is_bearer(&self) -> bool {
        self.scheme == "bearer"
    }
}

/// The parameters of a `Bearer` challenge needed for a token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BearerChallenge {
    /// Token endpoint URL
    pub realm: String,
    /// Service the token is requested for
    pub service: String,
    /// Requested scope; empty means the query parameter is omitted
    pub scope: String,
}

impl BearerChallenge {
    /// Extracts a bearer challenge, or `None` if the scheme is not `bearer`.
    ///
    /// Missing parameters are left empty.
    pub fn from_challenge(challenge: &AuthChallenge) -> Option<Self> {
        if !challenge.is_bearer() {
            return None;
        }
        let get = |name: &str| challenge.param(name).unwrap_or_default().to_string();
        Some(Self {
            realm: get("realm"),
            service: get("service"),
            scope: get("scope"),
        })
    }
}

/// Parses every header value in order, dropping values without a scheme.
pub fn parse_challenges<'a, I>(values: I) -> Vec<AuthChallenge>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    values
        .into_iter()
        .filter_map(AuthChallenge::parse_bytes)
        .collect()
}

/// Parses all `WWW-Authenticate` headers of a response.
pub fn from_headers(headers: &HeaderMap) -> Vec<AuthChallenge> {
    parse_challenges(headers.get_all(WWW_AUTHENTICATE).iter().map(|v| v.as_bytes()))
}

fn lossy_lowercase(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_lowercase()
}

fn skip_space(s: &[u8]) -> &[u8] {
    let i = s
        .iter()
        .position(|&b| OCTET_TYPES[b as usize] & IS_SPACE == 0)
        .unwrap_or(s.len());
    &s[i..]
}

/// Splits `s` into a leading token and the rest.
fn expect_token(s: &[u8]) -> (&[u8], &[u8]) {
    let i = s
        .iter()
        .position(|&b| OCTET_TYPES[b as usize] & IS_TOKEN == 0)
        .unwrap_or(s.len());
    s.split_at(i)
}

/// Splits `s` into a token or decoded quoted-string and the rest.
///
/// Returns `None` for an unterminated quoted-string.
fn expect_token_or_quoted(s: &[u8]) -> Option<(Vec<u8>, &[u8])> {
    let Some(quoted) = s.strip_prefix(b"\"") else {
        let (token, rest) = expect_token(s);
        return Some((token.to_vec(), rest));
    };

    let mut value = Vec::with_capacity(quoted.len());
    let mut escape = false;
    for (i, &b) in quoted.iter().enumerate() {
        match b {
            _ if escape => {
                escape = false;
                value.push(b);
            }
            b'\\' => escape = true,
            b'"' => return Some((value, &quoted[i + 1..])),
            _ => value.push(b),
        }
    }
    None
}
