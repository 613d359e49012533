use serde::Serialize;
use std::collections::BTreeMap;

use super::form_fields::{is_blank, FormFields};

/// Custom variables attached to a member or a message, name -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping built from one unindexed `variable`/`value` pair, empty when
    /// no name was given.
    pub fn single(name: Option<&str>, value: Option<&str>) -> Self {
        let mut variables = Self::new();
        if let Some(name) = name.filter(|n| !is_blank(n)) {
            variables.insert(name, value.unwrap_or_default());
        }
        variables
    }

    /// Like [`Variables::single`], but only an empty name is dropped.
    pub fn shared(name: Option<&str>, value: Option<&str>) -> Self {
        let mut variables = Self::new();
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            variables.insert(name, value.unwrap_or_default());
        }
        variables
    }

    /// Repeated names overwrite: last write wins.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariablePair {
    pub name: String,
    pub value: String,
}

/// Ordered `(name, value)` pairs read from a form, blank names already dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariablePairs(Vec<VariablePair>);

impl VariablePairs {
    /// Reads the indexed rows of a form: each `variable` field carries an
    /// index token `i` and the row itself is `variable-<i>` / `value-<i>`.
    pub fn indexed(fields: &FormFields) -> Self {
        let mut pairs = Self::default();
        for index in fields.values("variable") {
            pairs.push_named(
                fields.value(&format!("variable-{index}")),
                fields.value(&format!("value-{index}")),
            );
        }
        pairs
    }

    pub fn push_named(&mut self, name: Option<&str>, value: Option<&str>) {
        match name {
            Some(name) if !is_blank(name) => self.0.push(VariablePair {
                name: name.to_string(),
                value: value.unwrap_or_default().to_string(),
            }),
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_variables(self) -> Variables {
        let mut variables = Variables::new();
        for VariablePair { name, value } in self.0 {
            variables.insert(name, value);
        }
        variables
    }
}
