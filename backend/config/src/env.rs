//! Environment variable substitution for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved after YAML parsing
//! so substituted text never changes the document structure. Only uppercase
//! `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to a literal `${VAR}`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using `env` (useful for testing).
pub fn resolve_env_vars_with(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    walk(value, env, "")
}

fn walk(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => substitute(s, env, path).map(Value::String),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| walk(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (k, v) in map {
                let key = k.as_str().map(str::to_string).unwrap_or_else(|| format!("{k:?}"));
                let child = if path.is_empty() { key } else { format!("{path}.{key}") };
                out.insert(k.clone(), walk(v, env, &child)?);
            }
            Ok(Value::Mapping(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute(
    text: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    let mut missing = None;
    let replaced = ENV_REF.replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{name}}}");
        }
        match env.get(name).filter(|v| !v.is_empty()) {
            Some(v) => v.clone(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });
    match missing {
        Some(var_name) => Err(MissingEnvVarError {
            var_name,
            config_path: path.to_string(),
        }),
        None => Ok(replaced.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn substitutes_nested_strings() {
        let value = yaml("search:\n  addresses:\n    - http://${ES_HOST}:9200\n  password: ${ES_PASS}\n");
        let out = resolve_env_vars_with(&value, &env(&[("ES_HOST", "10.0.0.5"), ("ES_PASS", "s3cret")])).unwrap();
        assert_eq!(out, yaml("search:\n  addresses:\n    - http://10.0.0.5:9200\n  password: s3cret\n"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let out = resolve_env_vars_with(&yaml("host: $${HOSTNAME}"), &env(&[])).unwrap();
        assert_eq!(out, yaml("host: ${HOSTNAME}"));
    }

    #[test]
    fn missing_var_reports_path() {
        let value = yaml("search:\n  addresses:\n    - ${ES_URL}\n");
        let err = resolve_env_vars_with(&value, &env(&[("ES_URL", "")])).unwrap_err();
        assert_eq!(err.var_name, "ES_URL");
        assert_eq!(err.config_path, "search.addresses[0]");
    }

    #[test]
    fn lowercase_names_are_not_references() {
        let out = resolve_env_vars_with(&yaml("a: ${lower}"), &env(&[])).unwrap();
        assert_eq!(out, yaml("a: ${lower}"));
    }
}
