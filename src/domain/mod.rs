mod email_address;
mod form_fields;
mod member;
mod message;
mod resources;
mod variables;

pub use email_address::{EmailAddress, Mailbox};
pub use form_fields::{FormError, FormFields};
pub use member::{BatchMember, MemberBatch, MemberUpdate, NewList, NewMember};
pub use message::{Attachment, OutboundMessage};
pub use resources::{
    MailingList, Member, Receipt, Template, TemplateSummary, TemplateVersion,
    TemplateVersionDetail,
};
pub use variables::{VariablePair, VariablePairs, Variables};
