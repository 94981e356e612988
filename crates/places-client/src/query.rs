//! Parameter store for a single pending request.
//!
//! A [`Query`] owns the endpoint path and every caller-set parameter. It is
//! read once at execution time by [`Query::to_url`], which merges the
//! client-wide defaults underneath the caller's values and renders a
//! canonical URL. Keys are kept sorted so identical setter sequences always
//! materialize byte-identical URLs.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;

/// Delimiter used when a list parameter is sent on the wire.
pub const LIST_DELIMITER: &str = "|";

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::List(items) => f.write_str(&items.join(LIST_DELIMITER)),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

/// Endpoint path plus the caller-set parameters of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    path: &'static str,
    params: BTreeMap<String, ParamValue>,
}

impl Query {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            params: BTreeMap::new(),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.params.insert(key.to_owned(), value.into());
    }

    /// Stores a `"{lat},{lng}"` pair under `key`.
    pub fn put_location(&mut self, key: &str, latitude: f64, longitude: f64) {
        self.put(key, format!("{latitude},{longitude}"));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Renders `base` + path + parameters into the final request URL.
    ///
    /// `defaults` are applied first; a caller-set parameter with the same
    /// name replaces the default. Parameters appear in ascending key order.
    pub fn to_url(&self, base: &Url, defaults: &[(&str, &str)]) -> Url {
        let mut merged: BTreeMap<&str, String> = defaults
            .iter()
            .map(|(k, v)| (*k, (*v).to_owned()))
            .collect();
        for (key, value) in &self.params {
            merged.insert(key.as_str(), value.to_string());
        }

        let mut url = base.clone();
        let path = format!("{}{}", base.path().trim_end_matches('/'), self.path);
        url.set_path(&path);
        url.set_query(None);
        if !merged.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &merged {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
