use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::warn;

use crate::sdk::api::SessionId;

/// Query parameter carrying the session id.
pub const SESSION_PARAM: &str = "p";
/// Query parameter carrying the optional label.
pub const LABEL_PARAM: &str = "i";

/// Characters escaped in query parameter values.
/// Matches the escaping of javascript's `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Everything needed to share a session between parties: the session id
/// and the optional human-chosen label. Transported as percent-encoded
/// query parameters on a link; neither value enters any cryptographic
/// material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLink {
    pub session_id: SessionId,
    pub label: Option<String>,
}

impl SessionLink {
    pub fn new(session_id: SessionId, label: Option<String>) -> Self {
        Self { session_id, label }
    }

    /// Render as a query string, e.g. `p=abc%2Fidenticall&i=alice`.
    pub fn to_query(&self) -> String {
        let mut query = format!(
            "{}={}",
            SESSION_PARAM,
            utf8_percent_encode(self.session_id.as_str(), QUERY_VALUE)
        );
        if let Some(label) = &self.label {
            query.push_str(&format!(
                "&{}={}",
                LABEL_PARAM,
                utf8_percent_encode(label, QUERY_VALUE)
            ));
        }
        query
    }

    /// Parse a query string. A missing or undecodable session parameter
    /// means "no active investigation"; an undecodable label or foreign
    /// parameter is skipped without discarding the rest of the link.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut session_id = None;
        let mut label = None;
        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            if key != SESSION_PARAM && key != LABEL_PARAM {
                continue; // foreign parameters pass through untouched
            }
            let value = match percent_decode_str(value).decode_utf8() {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => {
                    warn!("skipping undecodable query parameter {}", key);
                    continue;
                }
            };
            if key == SESSION_PARAM {
                session_id = Some(SessionId::new(value));
            } else {
                label = Some(value);
            }
        }
        session_id.map(|session_id| Self { session_id, label })
    }
}
