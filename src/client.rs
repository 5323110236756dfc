//! Relations query client.
//!
//! A query filters its input down to the recognized parameters, builds the
//! request URL, polls the endpoint until it answers with a non-empty body and
//! decodes the answer. Queries without any valid filter are never sent.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::config::Config;
use crate::error::QueryError;
use crate::fetch::{DecodeJson, HttpFetch, SerdeJsonDecoder, UreqFetcher};
use crate::params::{filter_json, filter_params, QueryParams};
use crate::polling::{poll, PollOutcome, PollingPolicy, Sleeper, ThreadSleeper};

/// Decoded answer with a non-empty `items` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Relations(Map<String, Value>);

impl Relations {
    /// Accept a decoded object only when its `items` entry is non-empty.
    pub fn from_map(map: Map<String, Value>) -> Option<Self> {
        match map.get("items") {
            Some(items) if !is_blank(items) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn items(&self) -> &Value {
        // from_map guarantees presence
        &self.0["items"]
    }

    /// Number of items; a non-array `items` counts as one.
    pub fn item_count(&self) -> usize {
        match self.items() {
            Value::Array(items) => items.len(),
            Value::Object(items) => items.len(),
            _ => 1,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Whether a JSON value counts as empty: `null`, `false`, zero, `""`, `"0"`,
/// or an empty array or object.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// A body the endpoint sends while it has nothing to say yet.
fn is_empty_answer(body: &str) -> bool {
    body.is_empty() || body == "0"
}

/// Client for the relations endpoint.
///
/// The HTTP fetch, JSON decode and sleep are injected; [`RelationsQueryClient::new`]
/// wires the `ureq`, `serde_json` and thread-sleep defaults.
#[derive(Debug, Clone)]
pub struct RelationsQueryClient<F = UreqFetcher, D = SerdeJsonDecoder, S = ThreadSleeper> {
    endpoint: String,
    policy: PollingPolicy,
    fetcher: F,
    decoder: D,
    sleeper: S,
}

impl RelationsQueryClient {
    /// Client with the default capabilities, configured from `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config.api.endpoint.clone(),
            PollingPolicy::from(&config.polling),
            UreqFetcher::from(&config.api),
            SerdeJsonDecoder,
            ThreadSleeper,
        )
    }
}

impl<F, D, S> RelationsQueryClient<F, D, S>
where
    F: HttpFetch,
    D: DecodeJson,
    S: Sleeper,
{
    pub fn with_parts(
        endpoint: impl Into<String>,
        policy: PollingPolicy,
        fetcher: F,
        decoder: D,
        sleeper: S,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            policy,
            fetcher,
            decoder,
            sleeper,
        }
    }

    /// Replace the HTTP fetch capability.
    pub fn with_fetcher<F2: HttpFetch>(self, fetcher: F2) -> RelationsQueryClient<F2, D, S> {
        RelationsQueryClient {
            endpoint: self.endpoint,
            policy: self.policy,
            fetcher,
            decoder: self.decoder,
            sleeper: self.sleeper,
        }
    }

    /// Replace the sleep capability.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> RelationsQueryClient<F, D, S2> {
        RelationsQueryClient {
            endpoint: self.endpoint,
            policy: self.policy,
            fetcher: self.fetcher,
            decoder: self.decoder,
            sleeper,
        }
    }

    pub fn with_policy(mut self, policy: PollingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn policy(&self) -> &PollingPolicy {
        &self.policy
    }

    /// Endpoint plus the form-encoded parameters in `cif`, `oc`, `og`, `ut` order.
    pub fn build_url(&self, params: &QueryParams) -> Result<String, QueryError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| QueryError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.pairs());
        }

        Ok(url.into())
    }

    /// Filter `data` and query the endpoint.
    ///
    /// Returns `Ok(None)` without touching the network when no filter is
    /// valid, and when the answer has no non-empty `items`.
    pub fn query<I, K, V>(&self, data: I) -> Result<Option<Relations>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.query_params(&filter_params(data))
    }

    /// [`Self::query`] over a JSON object of filters.
    pub fn query_json(&self, data: &Map<String, Value>) -> Result<Option<Relations>, QueryError> {
        self.query_params(&filter_json(data))
    }

    /// Query with already filtered parameters.
    pub fn query_params(&self, params: &QueryParams) -> Result<Option<Relations>, QueryError> {
        if params.is_empty() {
            tracing::info!("no valid filters, query not sent");
            return Ok(None);
        }

        let url = self.build_url(params)?;
        let body = self.fetch_answer(&url)?;

        let relations = self.decoder.decode(&body).and_then(Relations::from_map);
        if relations.is_none() {
            tracing::info!(url = %url, "answer has no items");
        }
        Ok(relations)
    }

    /// Poll `url` until it answers with a non-empty body.
    fn fetch_answer(&self, url: &str) -> Result<String, QueryError> {
        let outcome = poll(&self.policy, &self.sleeper, |attempt| {
            tracing::debug!(attempt, url, "fetching relations");
            let body = self.fetcher.get(url)?;
            Ok(if is_empty_answer(&body) {
                None
            } else {
                Some(body)
            })
        })?;

        match outcome {
            PollOutcome::Ready(body) => Ok(body),
            PollOutcome::Exhausted { attempts } => Err(QueryError::RetriesExhausted {
                url: url.to_string(),
                attempts,
            }),
        }
    }
}
