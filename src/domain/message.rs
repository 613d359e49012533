use super::form_fields::{FormError, FormFields};
use super::variables::{VariablePairs, Variables};
use super::EmailAddress;

/// A file uploaded alongside a compose submission.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

/// A templated message addressed to a whole mailing list.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub from: String,
    pub subject: String,
    pub template: String,
    pub to: EmailAddress,
    pub tag: String,
    pub variables: Variables,
    pub reply_to: Option<String>,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    pub fn parse(fields: &FormFields, attachment: Option<Attachment>) -> Result<Self, FormError> {
        let template = fields.required("template")?.to_string();
        let to = EmailAddress::parse(fields.required("list")?)
            .map_err(|reason| FormError::Invalid { field: "list", reason })?;

        Ok(Self {
            from: fields.required("from")?.to_string(),
            subject: fields.required("subject")?.to_string(),
            tag: template.clone(),
            template,
            to,
            variables: VariablePairs::indexed(fields).into_variables(),
            reply_to: fields.non_blank("replyto").map(str::to_string),
            attachment,
        })
    }
}
