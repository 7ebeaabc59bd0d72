//! Picks a response callback for a request.
//!
//! A [`Negotiator`] is built per request by attaching callbacks to format tags, then consumed by
//! [`Negotiator::resolve`], which runs exactly one of them:
//!
//! 1. the callback bound to the URL path extension (`/users.json` selects `json`),
//! 2. otherwise the callback for the first `Accept` token whose registered format tag is bound,
//! 3. otherwise any one bound callback.
//!
//! Nothing is run when no callback was attached.
//!
//! # Example
//!
//! ```
//! use http::Request;
//! use micro_responder::with;
//!
//! let request = Request::builder()
//!     .uri("/users")
//!     .header(http::header::ACCEPT, "application/json")
//!     .body(())
//!     .unwrap();
//!
//! let body = with("html", || "<p>users</p>")
//!     .attach(["json", "xml"], || "users as data")
//!     .resolve(&request);
//!
//! assert_eq!(body, Some("users as data"));
//! ```

use crate::format::FormatSpec;
use crate::registry::FormatRegistry;
use crate::request::{accept_tokens, path_extension, RequestView};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

type Respond<'a, R> = Box<dyn FnOnce() -> R + 'a>;

/// Starts a [`Negotiator`] on the global [`FormatRegistry`] with one attachment.
pub fn with<'a, R>(formats: impl Into<FormatSpec>, respond: impl FnOnce() -> R + 'a) -> Negotiator<'a, R> {
    Negotiator::new().attach(formats, respond)
}

/// Maps format tags to response callbacks and chooses one of them for a request.
pub struct Negotiator<'a, R = ()> {
    registry: &'a FormatRegistry,
    responds: HashMap<String, usize>,
    callbacks: Vec<Respond<'a, R>>,
}

/// Which step of negotiation chose the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// The URL path extension named a bound tag.
    Extension,
    /// An `Accept` token was registered to a bound tag.
    Accept,
    /// Nothing matched; an arbitrary bound tag was used.
    Fallback,
}

/// The outcome of [`Negotiator::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub tag: String,
    pub source: MatchSource,
}

impl<'a, R> Negotiator<'a, R> {
    /// Creates an empty negotiator that resolves `Accept` tokens with the global registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(FormatRegistry::global())
    }

    /// Creates an empty negotiator that resolves `Accept` tokens with `registry`.
    #[must_use]
    pub fn with_registry(registry: &'a FormatRegistry) -> Self {
        Self { registry, responds: HashMap::new(), callbacks: Vec::new() }
    }

    /// Binds `respond` to every tag in `formats`.
    ///
    /// A tag that is already bound is rebound to `respond`. [`FormatSpec::Ignored`] binds nothing.
    pub fn attach(mut self, formats: impl Into<FormatSpec>, respond: impl FnOnce() -> R + 'a) -> Self {
        let tags = formats.into().into_tags();
        if tags.is_empty() {
            trace!("nothing to attach");
            return self;
        }

        let index = self.callbacks.len();
        self.callbacks.push(Box::new(respond));
        for tag in tags {
            self.responds.insert(tag, index);
        }
        self
    }

    /// Returns true if `tag` has a callback bound.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.responds.contains_key(tag)
    }

    /// Returns the number of bound tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responds.is_empty()
    }

    /// Chooses the format for `request` without running any callback.
    ///
    /// Returns `None` only when no tag is bound. Which tag the fallback step returns is
    /// unspecified; callers must not depend on it.
    #[must_use]
    pub fn select(&self, request: &impl RequestView) -> Option<Negotiated> {
        let path = request.path();
        if let Some(tag) = path_extension(path).strip_prefix('.')
            && self.responds.contains_key(tag)
        {
            debug!(path, tag, "format negotiated by path extension");
            return Some(Negotiated { tag: tag.to_owned(), source: MatchSource::Extension });
        }

        let accept = request.accept().unwrap_or_default();
        for token in accept_tokens(accept) {
            let Some(tag) = self.registry.lookup(token) else {
                continue;
            };

            if self.responds.contains_key(&tag) {
                debug!(media_type = token, tag = %tag, "format negotiated by accept header");
                return Some(Negotiated { tag, source: MatchSource::Accept });
            }
            trace!(media_type = token, tag = %tag, "no callback for accepted format");
        }

        let tag = self.responds.keys().next()?;
        debug!(path, accept = %String::from_utf8_lossy(accept), tag = %tag, "no format matched, falling back");
        Some(Negotiated { tag: tag.clone(), source: MatchSource::Fallback })
    }

    /// Runs the callback chosen by [`select`](Self::select) and returns its result.
    ///
    /// Returns `None` without running anything when no tag is bound.
    pub fn resolve(mut self, request: &impl RequestView) -> Option<R> {
        let negotiated = self.select(request)?;
        let index = self.responds.get(&negotiated.tag).copied()?;
        let respond = self.callbacks.swap_remove(index);
        Some(respond())
    }
}

impl<R> Default for Negotiator<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Negotiator<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator").field("formats", &self.responds.keys().collect::<Vec<_>>()).finish_non_exhaustive()
    }
}
