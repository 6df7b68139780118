//! Query Codec
//!
//! Two reserved query keys carry base64-encoded JSON blobs:
//! `params` (per-route state) and `context` (state shared across routes).
//! Every other query pair is passed through untouched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::RouterResult;

/// Reserved query-string keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Params,
    Context,
}

impl QueryKey {
    pub const ALL: [QueryKey; 2] = [QueryKey::Context, QueryKey::Params];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Params => "params",
            QueryKey::Context => "context",
        }
    }
}

pub fn encode_search_param<T: Serialize + ?Sized>(value: &T) -> RouterResult<String> {
    let json = serde_json::to_vec(value)?;
    Ok(STANDARD.encode(json))
}

pub fn decode_search_param<T: DeserializeOwned>(encoded: &str) -> RouterResult<T> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Raw (still encoded) values of both reserved keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedQuery {
    pub params: Option<String>,
    pub context: Option<String>,
}

impl EncodedQuery {
    pub fn get(&self, key: QueryKey) -> Option<&str> {
        match key {
            QueryKey::Params => self.params.as_deref(),
            QueryKey::Context => self.context.as_deref(),
        }
    }
}

/// Read both reserved keys out of a search string (with or without `?`)
pub fn get_query_encoded(search: &str) -> EncodedQuery {
    let query = search.strip_prefix('?').unwrap_or(search);
    let mut encoded = EncodedQuery::default();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let slot = if name == QueryKey::Params.as_str() {
            &mut encoded.params
        } else if name == QueryKey::Context.as_str() {
            &mut encoded.context
        } else {
            continue;
        };
        // First occurrence wins, like URLSearchParams::get
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    encoded
}

/// Set or delete one reserved key on a copy of `url`
///
/// Setting replaces the first occurrence in place and drops later ones;
/// an absent key is appended. An empty value deletes the key.
pub fn update_query_key(url: &Url, key: QueryKey, encoded: Option<&str>) -> Url {
    let name = key.as_str();
    let encoded = encoded.filter(|v| !v.is_empty());

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut written = false;
    for (k, v) in url.query_pairs() {
        if k != name {
            pairs.push((k.into_owned(), v.into_owned()));
            continue;
        }
        if let (Some(value), false) = (encoded, written) {
            pairs.push((k.into_owned(), value.to_string()));
            written = true;
        }
    }
    if let (Some(value), false) = (encoded, written) {
        pairs.push((name.to_string(), value.to_string()));
    }

    let mut next = url.clone();
    if pairs.is_empty() {
        next.set_query(None);
    } else {
        next.query_pairs_mut().clear().extend_pairs(pairs);
    }
    next
}
