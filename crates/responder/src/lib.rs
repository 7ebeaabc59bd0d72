//! Content negotiation for request handlers.
//!
//! A handler attaches one callback per representation it can produce and lets the
//! [`Negotiator`] run the one that fits the request, chosen by the URL path extension first and
//! the `Accept` header second. [`FormatRegistry`] maps `Accept` media types to the format tags
//! callbacks are attached to.

mod format;
mod negotiator;
mod registry;

pub mod request;

pub use format::FormatSpec;
pub use negotiator::with;
pub use negotiator::MatchSource;
pub use negotiator::Negotiated;
pub use negotiator::Negotiator;
pub use registry::FormatRegistry;
pub use registry::RegistryError;
pub use registry::BUILTIN_FORMATS;
pub use request::RequestView;
