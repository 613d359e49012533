use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::Display;
use validator::ValidateEmail;

/// An address accepted by the upstream API: a list address or a member address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress(String);

impl ValidateEmail for EmailAddress {
    fn as_email_string(&self) -> Option<Cow<str>> {
        Some(Cow::Borrowed(&self.0))
    }
}

impl EmailAddress {
    pub fn parse(s: &str) -> Result<Self, String> {
        let email = EmailAddress(s.trim().to_string());
        if email.validate_email() {
            Ok(email)
        } else {
            Err(format!("{} is not a valid email address", s.trim()))
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A member address as typed into a form: either bare or wrapped with a
/// display name, `Ada Lovelace <ada@example.com>`. Only the part inside the
/// angle brackets is validated; the text is forwarded as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    text: String,
    address: EmailAddress,
}

impl Mailbox {
    pub fn parse(s: &str) -> Result<Self, String> {
        let text = s.trim();
        let address = match text.strip_suffix('>').and_then(|t| t.rsplit_once('<')) {
            Some((name, inner)) if !name.contains(['<', '>']) => EmailAddress::parse(inner)?,
            _ => EmailAddress::parse(text)?,
        };
        Ok(Self {
            text: text.to_string(),
            address,
        })
    }

    /// The bare address, without any display name.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

impl AsRef<str> for Mailbox {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.text.fmt(f)
    }
}

impl Serialize for Mailbox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
