/// A submitted form, in submission order. Keys may repeat (the `variable`
/// index tokens do), so this is a list of pairs rather than a map.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FormError {
    #[error("The `{0}` field is required")]
    Missing(&'static str),
    #[error("The `{field}` field is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("The form could not be read: {0}")]
    Malformed(String),
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl FormFields {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    /// First value submitted under `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `name`, in order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.value(name).filter(|v| !is_blank(v))
    }

    pub fn required(&self, name: &'static str) -> Result<&str, FormError> {
        self.non_blank(name).ok_or(FormError::Missing(name))
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FormFields {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
