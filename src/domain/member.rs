use serde::Serialize;

use super::form_fields::{FormError, FormFields};
use super::variables::{VariablePairs, Variables};
use super::{EmailAddress, Mailbox};

fn address_field(fields: &FormFields, field: &'static str) -> Result<EmailAddress, FormError> {
    EmailAddress::parse(fields.required(field)?)
        .map_err(|reason| FormError::Invalid { field, reason })
}

fn mailbox_field(fields: &FormFields, field: &'static str) -> Result<Mailbox, FormError> {
    Mailbox::parse(fields.required(field)?).map_err(|reason| FormError::Invalid { field, reason })
}

fn optional_text(fields: &FormFields, field: &str) -> Option<String> {
    fields.non_blank(field).map(|v| v.trim().to_string())
}

#[derive(Debug, Clone)]
pub struct NewList {
    pub address: EmailAddress,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewList {
    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            address: address_field(fields, "address")?,
            name: optional_text(fields, "name"),
            description: optional_text(fields, "description"),
        })
    }
}

/// One member added through the single-member form.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub address: Mailbox,
    pub name: String,
    pub variables: Variables,
}

impl NewMember {
    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            address: mailbox_field(fields, "address")?,
            name: fields.value("name").unwrap_or_default().trim().to_string(),
            variables: Variables::single(fields.value("variable"), fields.value("value")),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMember {
    pub address: Mailbox,
    pub vars: Variables,
}

/// Members pasted into the bulk textbox, one address per line, all sharing
/// the same optional variable. Unlike the other forms, only an empty variable
/// name is ignored here; a whitespace name is kept as typed.
#[derive(Debug, Clone)]
pub struct MemberBatch(Vec<BatchMember>);

impl MemberBatch {
    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        let addresses = fields.value("addresses").ok_or(FormError::Missing("addresses"))?;
        let vars = Variables::shared(fields.value("variable"), fields.value("value"));

        let members = addresses
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                Mailbox::parse(line)
                    .map(|address| BatchMember {
                        address,
                        vars: vars.clone(),
                    })
                    .map_err(|reason| FormError::Invalid {
                        field: "addresses",
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if members.is_empty() {
            return Err(FormError::Missing("addresses"));
        }
        Ok(Self(members))
    }

    pub fn members(&self) -> &[BatchMember] {
        &self.0
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

/// Full replacement of a member's name, address and variables.
#[derive(Debug, Clone)]
pub struct MemberUpdate {
    pub address: Mailbox,
    pub name: String,
    pub variables: Variables,
}

impl MemberUpdate {
    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        let mut pairs = VariablePairs::indexed(fields);
        pairs.push_named(fields.value("variable-new"), fields.value("value-new"));

        Ok(Self {
            address: mailbox_field(fields, "address")?,
            name: fields.value("name").unwrap_or_default().trim().to_string(),
            variables: pairs.into_variables(),
        })
    }
}
