/// The format tags a callback is attached to.
///
/// Usually built through `From`, so a plain `"json"` or `["json", "xml"]` can be passed
/// to [`Negotiator::attach`](crate::Negotiator::attach) directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    /// A single format tag.
    Single(String),
    /// Several format tags sharing one callback.
    Many(Vec<String>),
    /// Attaches nothing.
    Ignored,
}

impl FormatSpec {
    /// Returns the tags this spec binds, in the order given.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            FormatSpec::Single(tag) => std::slice::from_ref(tag),
            FormatSpec::Many(tags) => tags,
            FormatSpec::Ignored => &[],
        }
    }

    pub(crate) fn into_tags(self) -> Vec<String> {
        match self {
            FormatSpec::Single(tag) => vec![tag],
            FormatSpec::Many(tags) => tags,
            FormatSpec::Ignored => vec![],
        }
    }
}

impl From<&str> for FormatSpec {
    fn from(tag: &str) -> Self {
        FormatSpec::Single(tag.to_owned())
    }
}

impl From<String> for FormatSpec {
    fn from(tag: String) -> Self {
        FormatSpec::Single(tag)
    }
}

impl From<Vec<String>> for FormatSpec {
    fn from(tags: Vec<String>) -> Self {
        FormatSpec::Many(tags)
    }
}

impl From<Vec<&str>> for FormatSpec {
    fn from(tags: Vec<&str>) -> Self {
        tags.as_slice().into()
    }
}

impl From<&[&str]> for FormatSpec {
    fn from(tags: &[&str]) -> Self {
        FormatSpec::Many(tags.iter().map(|tag| (*tag).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FormatSpec {
    fn from(tags: [&str; N]) -> Self {
        tags.as_slice().into()
    }
}

impl<T: Into<FormatSpec>> From<Option<T>> for FormatSpec {
    fn from(spec: Option<T>) -> Self {
        spec.map_or(FormatSpec::Ignored, Into::into)
    }
}
