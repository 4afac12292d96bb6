//! Query-string serialization
//!
//! Scalars serialize as `key=value`; lists serialize as repeated
//! `key[]=value` pairs, which is what the server's array parser expects.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<QueryValue>),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(","))
            },
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered list of query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.push((key.into(), value.into()));
    }

    /// Append a parameter only when a value is present
    pub fn push_opt<V: Into<QueryValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Serialize parameters into a query string (without the leading `?`)
#[must_use]
pub fn build_query(params: &QueryParams) -> String {
    let mut pairs = Vec::new();
    for (key, value) in &params.params {
        let key = urlencoding::encode(key);
        match value {
            QueryValue::List(items) => {
                for item in flatten(items) {
                    pairs.push(format!("{key}[]={}", urlencoding::encode(&item.to_string())));
                }
            },
            scalar => pairs.push(format!("{key}={}", urlencoding::encode(&scalar.to_string()))),
        }
    }
    pairs.join("&")
}

fn flatten(items: &[QueryValue]) -> Vec<&QueryValue> {
    items
        .iter()
        .flat_map(|item| match item {
            QueryValue::List(inner) => flatten(inner),
            scalar => vec![scalar],
        })
        .collect()
}
