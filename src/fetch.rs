//! HTTP fetch and JSON decode capabilities used by the relations client.
//!
//! Both are traits so the client can run against scripted responses; the
//! defaults are a blocking `ureq` GET and `serde_json`.

use serde_json::{Map, Value};
use ureq::AgentBuilder;

use crate::config::ApiConfig;
use crate::error::QueryError;

/// Blocking HTTP GET.
pub trait HttpFetch {
    /// Fetch `url` and return the response body.
    ///
    /// A 2xx answer returns its body, which may be empty. Connection
    /// failures and non-success statuses are errors.
    fn get(&self, url: &str) -> Result<String, QueryError>;
}

impl<T> HttpFetch for T
where
    T: Fn(&str) -> Result<String, QueryError>,
{
    fn get(&self, url: &str) -> Result<String, QueryError> {
        self(url)
    }
}

/// `ureq` implementation. Builds a fresh agent per request, so nothing is
/// pooled between calls.
#[derive(Debug, Clone)]
pub struct UreqFetcher {
    pub user_agent: String,
}

impl UreqFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl From<&ApiConfig> for UreqFetcher {
    fn from(config: &ApiConfig) -> Self {
        Self::new(config.user_agent.clone())
    }
}

impl HttpFetch for UreqFetcher {
    fn get(&self, url: &str) -> Result<String, QueryError> {
        let agent = AgentBuilder::new().user_agent(&self.user_agent).build();

        let response = agent
            .get(url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => QueryError::Status {
                    url: url.to_string(),
                    code,
                    status_text: response.status_text().to_string(),
                },
                ureq::Error::Transport(transport) => QueryError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                },
            })?;

        response.into_string().map_err(|e| QueryError::Transport {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })
    }
}

/// JSON body decoding.
pub trait DecodeJson {
    /// Decode `body` into a JSON object; `None` when it is not valid JSON
    /// or not an object.
    fn decode(&self, body: &str) -> Option<Map<String, Value>>;
}

/// `serde_json` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonDecoder;

impl DecodeJson for SerdeJsonDecoder {
    fn decode(&self, body: &str) -> Option<Map<String, Value>> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "response body is not valid JSON");
                None
            }
        }
    }
}
