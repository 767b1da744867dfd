//! Query parameter validation for `/fib`.

use std::num::ParseIntError;

use thiserror::Error;

/// Name of the index query parameter.
pub const INDEX_PARAM: &str = "i";

/// Why a `/fib` query was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// Zero or more than one `i` value.
    #[error("Wrong number of arguments.")]
    WrongArity { values: Vec<String> },

    #[error("{source}")]
    NotAnInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ParamError {
    /// Every raw `i` value found in the query.
    pub fn values(&self) -> &[String] {
        match self {
            ParamError::WrongArity { values } => values,
            ParamError::NotAnInteger { value, .. } => std::slice::from_ref(value),
        }
    }

    /// Human-readable body for the 503 response.
    pub fn message(&self) -> String {
        format!("Couldn't parse index {:?}: {}", self.values(), self)
    }
}

/// Pull exactly one base-10 index out of a raw query string.
///
/// Negative values are accepted; they are base cases downstream.
pub fn parse_index(query: Option<&str>) -> Result<i64, ParamError> {
    let values: Vec<String> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(key, _)| key == INDEX_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect();

    match <[String; 1]>::try_from(values) {
        Ok([value]) => value
            .parse::<i64>()
            .map_err(|source| ParamError::NotAnInteger { value, source }),
        Err(values) => Err(ParamError::WrongArity { values }),
    }
}
