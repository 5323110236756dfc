//! `query` command: look up relations in the FACe directory.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

use face_relations::client::{Relations, RelationsQueryClient};
use face_relations::config::Config;
use face_relations::params::{filter_params, filter_value, ParamKey, QueryParams};
use face_relations::polling::PollingPolicy;

use crate::cli::OutputFormat;

/// Arguments of the `query` command
pub struct QueryArgs {
    pub cif: Option<String>,
    pub oc: Option<String>,
    pub og: Option<String>,
    pub ut: Option<String>,
    pub params: Vec<String>,
    pub endpoint: Option<String>,
    pub max_attempts: Option<usize>,
    pub format: OutputFormat,
}

impl QueryArgs {
    /// Named flags first, then `--param` entries, as raw key/value pairs.
    fn raw_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs: Vec<(String, String)> = [
            (ParamKey::Cif, &self.cif),
            (ParamKey::Oc, &self.oc),
            (ParamKey::Og, &self.og),
            (ParamKey::Ut, &self.ut),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect();

        for entry in &self.params {
            pairs.push(parse_key_value(entry)?);
        }

        Ok(pairs)
    }
}

/// Parse a `key=value` argument
pub fn parse_key_value(entry: &str) -> Result<(String, String)> {
    let (key, value) = entry
        .split_once('=')
        .with_context(|| format!("Invalid --param '{}': expected KEY=VALUE", entry))?;
    Ok((key.trim().to_string(), value.to_string()))
}

pub fn cmd_query(args: QueryArgs, config: &Config, quiet: bool) -> Result<()> {
    let raw = args.raw_pairs()?;
    let params = filter_params(raw.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    if !quiet {
        for warning in rejected_inputs(&raw) {
            eprintln!("{} {}", "Warning:".yellow(), warning);
        }
    }

    if params.is_empty() {
        if !quiet {
            eprintln!(
                "{} No valid filters given (cif, oc, og, ut); nothing to query",
                "⚠".yellow()
            );
        }
        if args.format == OutputFormat::Json {
            println!("null");
        }
        return Ok(());
    }

    let mut policy = PollingPolicy::from(&config.polling);
    if let Some(max) = args.max_attempts {
        if max == 0 {
            anyhow::bail!("--max-attempts must be greater than 0");
        }
        policy.max_attempts = Some(max);
    }

    let mut client = RelationsQueryClient::new(config).with_policy(policy);
    if let Some(endpoint) = args.endpoint {
        client = client.with_endpoint(endpoint);
    }

    let spinner = (!quiet && args.format == OutputFormat::Text)
        .then(|| start_spinner(&describe_params(&params)));

    let result = client.query_params(&params);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let relations = result.context("Relations query failed")?;

    match (args.format, relations) {
        (OutputFormat::Json, Some(relations)) => {
            let json = serde_json::to_string_pretty(&relations)
                .context("Failed to serialize relations")?;
            println!("{}", json);
        }
        (OutputFormat::Json, None) => println!("null"),
        (OutputFormat::Text, Some(relations)) => print_relations(&relations),
        (OutputFormat::Text, None) => {
            println!("No relations found for {}", describe_params(&params));
        }
    }

    Ok(())
}

/// Human-readable reasons for inputs that did not survive filtering.
fn rejected_inputs(raw: &[(String, String)]) -> Vec<String> {
    raw.iter()
        .filter_map(|(key, value)| match key.parse::<ParamKey>() {
            Err(e) => Some(e),
            Ok(key) if filter_value(key, value).is_none() => {
                Some(format!("Ignoring invalid {} '{}'", key, value.trim()))
            }
            Ok(_) => None,
        })
        .collect()
}

fn describe_params(params: &QueryParams) -> String {
    params
        .pairs()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn start_spinner(what: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Querying FACe relations for {}", what));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_relations(relations: &Relations) {
    let count = relations.item_count();
    println!(
        "{} Found {} relation{}",
        "✓".green(),
        count,
        if count == 1 { "" } else { "s" }
    );

    match relations.items() {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                println!("\n{}", format!("#{}", index + 1).bold());
                print_item(item);
            }
        }
        item => print_item(item),
    }
}

fn print_item(item: &Value) {
    match item {
        Value::Object(fields) => {
            for (key, value) in fields {
                println!("  {}: {}", key.cyan(), describe_value(value));
            }
        }
        other => println!("  {}", describe_value(other)),
    }
}

/// One-line rendering; objects with `codigo`/`nombre` show as "CODE - Name".
fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(fields) => {
            match (
                fields.get("codigo").and_then(Value::as_str),
                fields.get("nombre").and_then(Value::as_str),
            ) {
                (Some(code), Some(name)) => format!("{} - {}", code, name),
                (Some(code), None) => code.to_string(),
                _ => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> QueryArgs {
        QueryArgs {
            cif: None,
            oc: None,
            og: None,
            ut: None,
            params: vec![],
            endpoint: None,
            max_attempts: None,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("oc=L01281230").unwrap(),
            ("oc".to_string(), "L01281230".to_string())
        );
        assert_eq!(
            parse_key_value(" ut =a=b").unwrap(),
            ("ut".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("oc").is_err());
    }

    #[test]
    fn test_raw_pairs_order() {
        let mut args = args();
        args.ut = Some("GE0001234".to_string());
        args.cif = Some("A58818501".to_string());
        args.params = vec!["og=EA0008547".to_string()];

        let keys: Vec<_> = args
            .raw_pairs()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["cif", "ut", "og"]);
    }

    #[test]
    fn test_rejected_inputs() {
        let raw = vec![
            ("cif".to_string(), "12345678A".to_string()),
            ("oc".to_string(), "L01281230".to_string()),
            ("nif".to_string(), "12345678Z".to_string()),
        ];
        let warnings = rejected_inputs(&raw);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], "Ignoring invalid cif '12345678A'");
        assert!(warnings[1].contains("Unknown parameter 'nif'"));
    }

    #[test]
    fn test_empty_filters_skip_network() {
        let mut args = args();
        args.cif = Some("not-a-nif".to_string());
        args.endpoint = Some("http://127.0.0.1:9/never".to_string());

        assert!(cmd_query(args, &Config::default(), true).is_ok());
    }

    #[test]
    fn test_zero_max_attempts_rejected() {
        let mut args = args();
        args.oc = Some("L01281230".to_string());
        args.max_attempts = Some(0);

        assert!(cmd_query(args, &Config::default(), true).is_err());
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(
            describe_value(&json!({"codigo": "L01281230", "nombre": "Intervención"})),
            "L01281230 - Intervención"
        );
        assert_eq!(describe_value(&json!("plain")), "plain");
        assert_eq!(describe_value(&json!(3)), "3");
        assert_eq!(describe_value(&json!({"x": 1})), r#"{"x":1}"#);
    }

    #[test]
    fn test_describe_params() {
        let params = filter_params([("og", "EA0008547"), ("cif", "A58818501")]);
        assert_eq!(describe_params(&params), "cif=A58818501, og=EA0008547");
    }
}
