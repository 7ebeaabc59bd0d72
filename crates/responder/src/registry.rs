//! Media type to format tag registry.
//!
//! The registry maps a media type as it appears in an `Accept` header (for example
//! `application/json`) to the short format tag a [`Negotiator`](crate::Negotiator) binds
//! callbacks to (for example `json`).
//!
//! Reads never block: every lookup loads an immutable snapshot, and writes publish a new
//! snapshot, so registrations can happen while requests are being negotiated on other threads.

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Entries every seeded registry starts with.
pub const BUILTIN_FORMATS: [(&str, &str); 3] =
    [("text/html", "html"), ("application/json", "json"), ("application/xml", "xml")];

static GLOBAL_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::new);

type Entries = HashMap<String, String>;

/// A shared mapping from media type to format tag.
///
/// Keys are unique and compared verbatim; registering an existing media type replaces its
/// tag. Entries are never removed.
pub struct FormatRegistry {
    entries: ArcSwap<Entries>,
}

/// Error returned by [`FormatRegistry::try_register`].
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid media type '{media_type}': {source}")]
    InvalidMediaType {
        media_type: String,
        #[source]
        source: mime::FromStrError,
    },
}

impl FormatRegistry {
    /// Creates a registry holding the [`BUILTIN_FORMATS`].
    #[must_use]
    pub fn new() -> Self {
        BUILTIN_FORMATS.into_iter().collect()
    }

    /// Creates a registry with no entries at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries: ArcSwap::from_pointee(Entries::new()) }
    }

    /// Returns the process-wide registry.
    ///
    /// It is seeded with the [`BUILTIN_FORMATS`] on first access and lives until the process
    /// exits. [`with`](crate::with) and [`Negotiator::new`](crate::Negotiator::new) resolve
    /// against it.
    #[must_use]
    pub fn global() -> &'static FormatRegistry {
        &GLOBAL_REGISTRY
    }

    /// Maps `media_type` to `format`, replacing any previous mapping.
    pub fn register(&self, media_type: impl Into<String>, format: impl Into<String>) {
        let media_type = media_type.into();
        let format = format.into();
        debug!(media_type = %media_type, format = %format, "register format");

        self.entries.rcu(|current| {
            let mut entries = Entries::clone(current);
            entries.insert(media_type.clone(), format.clone());
            entries
        });
    }

    /// Same as [`register`](Self::register), but rejects strings that do not parse as a
    /// `type/subtype` media type.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidMediaType`] when `media_type` is not a valid media type.
    /// The registry is left untouched in that case.
    pub fn try_register(&self, media_type: impl Into<String>, format: impl Into<String>) -> Result<(), RegistryError> {
        let media_type = media_type.into();
        if let Err(source) = media_type.parse::<mime::Mime>() {
            return Err(RegistryError::InvalidMediaType { media_type, source });
        }

        self.register(media_type, format);
        Ok(())
    }

    /// Returns the format tag registered for exactly `media_type`.
    #[must_use]
    pub fn lookup(&self, media_type: &str) -> Option<String> {
        let format = self.entries.load().get(media_type).cloned();
        trace!(media_type, found = format.is_some(), "lookup format");
        format
    }

    /// Returns true if `media_type` is registered.
    #[must_use]
    pub fn contains(&self, media_type: &str) -> bool {
        self.entries.load().contains_key(media_type)
    }

    /// Returns a media type registered for `format`.
    ///
    /// When several media types share the tag, the lexicographically smallest one is returned.
    #[must_use]
    pub fn media_type_for(&self, format: &str) -> Option<String> {
        let entries = self.entries.load();
        entries.iter().filter(|(_, tag)| tag.as_str() == format).map(|(media_type, _)| media_type).min().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.load().iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormatRegistry {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut entries = Entries::clone(&self.entries.load());
        entries.extend(iter.into_iter().map(|(media_type, format)| (media_type.into(), format.into())));
        self.entries.store(Arc::new(entries));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormatRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Self::empty();
        registry.extend(iter);
        registry
    }
}
