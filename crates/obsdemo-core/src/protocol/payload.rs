//! JSON response bodies and the `/hello` query.

use serde::{Deserialize, Serialize};

use crate::error::ObsError;

/// Paths advertised by the root index, in display order.
pub const ENDPOINTS: [&str; 3] = ["/health", "/hello", "/metrics"];

/// Name greeted when `/hello` has no `name` parameter.
pub const DEFAULT_NAME: &str = "world";

const INDEX_MESSAGE: &str = "DevOps Observability Demo is running";

/// `/health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }
}

/// `/hello` query string.
#[derive(Debug, Default, Deserialize)]
pub struct HelloQuery {
    /// Name to greet. Absent means [`DEFAULT_NAME`]; an empty value is kept as-is.
    #[serde(default)]
    pub name: Option<String>,
}

impl HelloQuery {
    /// Build from raw query pairs. A repeated `name` keeps the last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let name = pairs
            .into_iter()
            .filter(|(k, _)| k == "name")
            .map(|(_, v)| v)
            .last();
        Self { name }
    }
}

/// `/hello` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Greeting {
    pub message: String,
}

impl Greeting {
    pub fn for_name(name: Option<&str>) -> Self {
        let name = name.unwrap_or(DEFAULT_NAME);
        Self {
            message: format!("Hello, {name}!"),
        }
    }
}

/// `/` body: a short banner plus the advertised endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceIndex {
    pub message: String,
    pub endpoints: Vec<String>,
}

impl Default for ServiceIndex {
    fn default() -> Self {
        Self {
            message: INDEX_MESSAGE.into(),
            endpoints: ENDPOINTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Error body returned for any `ObsError` that reaches HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorBody {
    pub detail: String,
    pub code: String,
}

impl From<&ObsError> for ErrorBody {
    fn from(err: &ObsError) -> Self {
        Self {
            detail: err.to_string(),
            code: err.client_code().as_str().to_string(),
        }
    }
}
