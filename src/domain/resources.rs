//! Resources as returned by the upstream API. Fields the pages don't show are
//! skipped; optional ones tolerate both absence and `null`.

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_default_from_null;
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Deserialize)]
pub struct MailingList {
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
    #[serde(default)]
    pub members_count: u64,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub access_level: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub vars: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub subscribed: bool,
}

impl Member {
    /// Variables rendered as text; strings unquoted, anything else as JSON.
    pub fn vars_as_text(&self) -> impl Iterator<Item = (&str, String)> {
        self.vars.iter().map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.as_str(), text)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub created_at: String,
    #[serde(default)]
    pub versions: Vec<TemplateVersion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersion {
    pub tag: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub engine: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub comment: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub created_at: String,
    /// Only present when a single version is fetched.
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersionDetail {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
    pub version: TemplateVersion,
}

/// The body the upstream API answers a mutation with, kept whole for logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Receipt(serde_json::Value);

impl Receipt {
    pub fn message(&self) -> &str {
        self.0
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Done")
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
