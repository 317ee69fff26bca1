//! Per-request context: the parsed request plus the path parameters captured
//! by the matched route, with typed extraction helpers.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use crate::{Request, Response, StatusCode};

/// Where a request parameter was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
}

impl Location {
    fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
        }
    }
}

/// A request parameter that is missing or does not parse.
///
/// Rendered as `422 Unprocessable Entity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing {} parameter `{name}`", location.as_str())]
    Missing { location: Location, name: String },

    #[error("invalid {} parameter `{name}`: {value:?}", location.as_str())]
    Invalid {
        location: Location,
        name: String,
        value: String,
    },
}

impl From<ParamError> for Response {
    fn from(err: ParamError) -> Self {
        Response::detail(StatusCode::UnprocessableEntity, err.to_string())
    }
}

/// Path parameters captured by the matched route pattern.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.map.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Per-request context handed to route handlers.
#[derive(Debug)]
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self::with_params(request, PathParams::new())
    }

    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Parses a captured path parameter.
    pub fn path_param<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        parse(Location::Path, name, self.params.get(name))?.ok_or_else(|| ParamError::Missing {
            location: Location::Path,
            name: name.to_owned(),
        })
    }

    /// Parses an optional query parameter; absent means `Ok(None)`.
    pub fn query<T: FromStr>(&self, name: &str) -> Result<Option<T>, ParamError> {
        parse(Location::Query, name, self.request.query_param(name))
    }

    /// Parses a required query parameter.
    pub fn required_query<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        self.query(name)?.ok_or_else(|| ParamError::Missing {
            location: Location::Query,
            name: name.to_owned(),
        })
    }
}

fn parse<T: FromStr>(
    location: Location,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ParamError> {
    raw.map(|value| {
        value.parse().map_err(|_| ParamError::Invalid {
            location,
            name: name.to_owned(),
            value: value.to_owned(),
        })
    })
    .transpose()
}
