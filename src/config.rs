//! Free-form run inputs, loaded from a YAML file and fed into prompt
//! template interpolation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Key/value inputs for one crew run (topic, audience, and so on). The
/// schema is whatever the YAML file contains; values are rendered to text
/// when substituted into prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunInputs(pub BTreeMap<String, serde_yaml::Value>);

impl RunInputs {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inputs file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse inputs file {}", path.display()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), serde_yaml::Value::String(v.into())))
                .collect(),
        )
    }

    /// Render the value for `key` as the text substituted into prompts.
    pub fn render(&self, key: &str) -> Option<String> {
        let value = self.0.get(key)?;
        Some(match value {
            serde_yaml::Value::String(text) => text.clone(),
            serde_yaml::Value::Number(number) => number.to_string(),
            serde_yaml::Value::Bool(flag) => flag.to_string(),
            serde_yaml::Value::Null => String::new(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Replace every `{key}` whose key is present in `inputs`; placeholders with
/// unknown keys are left untouched.
pub fn interpolate(template: &str, inputs: &RunInputs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match inputs.render(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
