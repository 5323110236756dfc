//! Query parameter filtering for the relations endpoint.
//!
//! Only four keys are recognized: `cif` (a tax identifier, see [`crate::nif`])
//! and the directory codes `oc` (accounting office), `og` (managing body) and
//! `ut` (processing unit). Values are trimmed and uppercased; anything that
//! does not validate is dropped without error.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::nif;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{9}$").unwrap());

/// A recognized query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    Cif,
    Oc,
    Og,
    Ut,
}

impl ParamKey {
    /// All keys, in query string order.
    pub const ALL: [ParamKey; 4] = [ParamKey::Cif, ParamKey::Oc, ParamKey::Og, ParamKey::Ut];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::Cif => "cif",
            ParamKey::Oc => "oc",
            ParamKey::Og => "og",
            ParamKey::Ut => "ut",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cif" => Ok(ParamKey::Cif),
            "oc" => Ok(ParamKey::Oc),
            "og" => Ok(ParamKey::Og),
            "ut" => Ok(ParamKey::Ut),
            _ => Err(format!(
                "Unknown parameter '{}'. Valid parameters: cif, oc, og, ut",
                s
            )),
        }
    }
}

/// Validated filters for a relations query.
///
/// Iteration and serialization order is always `cif`, `oc`, `og`, `ut`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    cif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    oc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    og: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ut: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `raw` for `key` and store it when valid.
    ///
    /// Returns whether the value was accepted. A rejected value leaves any
    /// previously accepted value for the same key in place.
    pub fn insert(&mut self, key: ParamKey, raw: &str) -> bool {
        match filter_value(key, raw) {
            Some(value) => {
                *self.slot_mut(key) = Some(value);
                true
            }
            None => {
                tracing::debug!(key = key.as_str(), value = raw, "dropping invalid parameter");
                false
            }
        }
    }

    pub fn get(&self, key: ParamKey) -> Option<&str> {
        match key {
            ParamKey::Cif => self.cif.as_deref(),
            ParamKey::Oc => self.oc.as_deref(),
            ParamKey::Og => self.og.as_deref(),
            ParamKey::Ut => self.ut.as_deref(),
        }
    }

    fn slot_mut(&mut self, key: ParamKey) -> &mut Option<String> {
        match key {
            ParamKey::Cif => &mut self.cif,
            ParamKey::Oc => &mut self.oc,
            ParamKey::Og => &mut self.og,
            ParamKey::Ut => &mut self.ut,
        }
    }

    /// Accepted `(key, value)` pairs in query string order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        ParamKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize and validate a single value for `key`.
///
/// `cif` may carry an `ES` prefix, which is removed from the returned value.
pub fn filter_value(key: ParamKey, raw: &str) -> Option<String> {
    let value = raw.trim().to_uppercase();
    match key {
        ParamKey::Cif => {
            let body = nif::strip_country_prefix(&value, nif::BODY_LEN);
            nif::validate(body).then(|| body.to_string())
        }
        ParamKey::Oc | ParamKey::Og | ParamKey::Ut => CODE_RE.is_match(&value).then_some(value),
    }
}

/// Keep the recognized, valid entries of `data`.
///
/// Unknown keys are dropped. When a key repeats, the last valid value wins.
pub fn filter_params<I, K, V>(data: I) -> QueryParams
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut params = QueryParams::new();
    for (key, value) in data {
        match key.as_ref().parse::<ParamKey>() {
            Ok(key) => {
                params.insert(key, value.as_ref());
            }
            Err(_) => tracing::debug!(key = key.as_ref(), "dropping unrecognized parameter"),
        }
    }
    params
}

/// [`filter_params`] over a JSON object.
///
/// Strings and numbers are taken as text; booleans, nulls, arrays and
/// objects are dropped.
pub fn filter_json(data: &Map<String, Value>) -> QueryParams {
    filter_params(data.iter().filter_map(|(key, value)| {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some((key, text))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_empty_input_yields_empty_params() {
        let params = filter_params(HashMap::<String, String>::new());
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.pairs().count(), 0);
    }

    #[test]
    fn test_cif_is_normalized_and_validated() {
        let params = filter_params([("cif", " esa58818501 ")]);
        assert_eq!(params.get(ParamKey::Cif), Some("A58818501"));

        let params = filter_params([("cif", "A58818502")]);
        assert!(params.is_empty());
    }

    #[test]
    fn test_cif_accepts_nif_and_nie() {
        assert_eq!(
            filter_value(ParamKey::Cif, "12345678z").as_deref(),
            Some("12345678Z")
        );
        assert_eq!(
            filter_value(ParamKey::Cif, "ESX1234567L").as_deref(),
            Some("X1234567L")
        );
    }

    #[test]
    fn test_codes_require_nine_alphanumerics() {
        assert_eq!(
            filter_value(ParamKey::Oc, " l01281230 ").as_deref(),
            Some("L01281230")
        );
        assert_eq!(
            filter_value(ParamKey::Og, "EA0008547").as_deref(),
            Some("EA0008547")
        );
        assert_eq!(filter_value(ParamKey::Ut, "GE000123").as_deref(), None);
        assert_eq!(filter_value(ParamKey::Ut, "GE00012345").as_deref(), None);
        assert_eq!(filter_value(ParamKey::Ut, "GE-000123").as_deref(), None);
    }

    #[test]
    fn test_codes_do_not_strip_country_prefix() {
        assert_eq!(filter_value(ParamKey::Oc, "ESL01281230"), None);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let params = filter_params([
            ("nif", "12345678Z"),
            ("CIF", "12345678Z"),
            ("oc", "L01281230"),
        ]);
        assert_eq!(params.pairs().collect::<Vec<_>>(), vec![("oc", "L01281230")]);
    }

    #[test]
    fn test_pairs_follow_stable_order() {
        let params = filter_params([
            ("ut", "GE0001234"),
            ("og", "EA0008547"),
            ("cif", "Q2826000H"),
            ("oc", "L01281230"),
        ]);
        let keys: Vec<_> = params.pairs().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["cif", "oc", "og", "ut"]);
    }

    #[test]
    fn test_repeated_key_keeps_last_valid_value() {
        let params = filter_params([
            ("oc", "L01281230"),
            ("oc", "bad"),
            ("og", "EA0008547"),
            ("og", "EA0008548"),
        ]);
        assert_eq!(params.get(ParamKey::Oc), Some("L01281230"));
        assert_eq!(params.get(ParamKey::Og), Some("EA0008548"));
    }

    #[test]
    fn test_filter_json_keeps_strings_and_numbers() {
        let data = json!({
            "cif": "a58818501",
            "oc": 123456789,
            "og": true,
            "ut": ["GE0001234"],
            "extra": "L01281230"
        });
        let params = filter_json(data.as_object().unwrap());
        assert_eq!(params.get(ParamKey::Cif), Some("A58818501"));
        assert_eq!(params.get(ParamKey::Oc), Some("123456789"));
        assert_eq!(params.get(ParamKey::Og), None);
        assert_eq!(params.get(ParamKey::Ut), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let params = filter_params([("ut", "GE0001234"), ("cif", "A58818501")]);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"cif":"A58818501","ut":"GE0001234"}"#);
    }

    #[test]
    fn test_param_key_parse() {
        assert_eq!("og".parse::<ParamKey>(), Ok(ParamKey::Og));
        assert!("xx".parse::<ParamKey>().is_err());
    }
}
