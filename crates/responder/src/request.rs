//! The parts of a request that negotiation looks at.
//!
//! Negotiation only needs the URL path and the raw `Accept` header, so it works on anything
//! implementing [`RequestView`] rather than on a concrete request type. Implementations are
//! provided for the `http` crate's request types.

use http::header::ACCEPT;
use http::request::Parts;
use http::{HeaderMap, HeaderValue, Request, Uri};

/// Read access to the request facets used by [`Negotiator`](crate::Negotiator).
pub trait RequestView {
    /// The URL path, without query string.
    fn path(&self) -> &str;

    /// The raw bytes of the first `Accept` header, or `None` if absent.
    fn accept(&self) -> Option<&[u8]>;
}

impl<B> RequestView for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn accept(&self) -> Option<&[u8]> {
        accept_value(self.headers())
    }
}

impl RequestView for Parts {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn accept(&self) -> Option<&[u8]> {
        accept_value(&self.headers)
    }
}

impl RequestView for (&Uri, &HeaderMap) {
    fn path(&self) -> &str {
        self.0.path()
    }

    fn accept(&self) -> Option<&[u8]> {
        accept_value(self.1)
    }
}

impl<T: RequestView + ?Sized> RequestView for &T {
    fn path(&self) -> &str {
        (**self).path()
    }

    fn accept(&self) -> Option<&[u8]> {
        (**self).accept()
    }
}

fn accept_value(headers: &HeaderMap) -> Option<&[u8]> {
    headers.get(ACCEPT).map(HeaderValue::as_bytes)
}

/// Returns the extension of the last path segment, including the leading `.`.
///
/// The result is empty when the last segment has no `.`.
#[must_use]
pub fn path_extension(path: &str) -> &str {
    let segment_start = path.rfind('/').map_or(0, |index| index + 1);
    path[segment_start..].rfind('.').map_or("", |index| &path[segment_start + index..])
}

/// Splits an `Accept` value on `,`, keeping every token verbatim.
///
/// Whitespace and parameters such as `;q=0.8` stay part of the token, and an empty value yields
/// a single empty token. A token that is not valid UTF-8 is skipped on its own; the tokens
/// around it are still returned.
pub fn accept_tokens(accept: &[u8]) -> impl Iterator<Item = &str> {
    accept.split(|byte| *byte == b',').filter_map(|token| std::str::from_utf8(token).ok())
}

#[cfg(test)]
mod tests {
    use super::{accept_tokens, path_extension, RequestView};
    use http::{HeaderMap, HeaderValue, Request, Uri};

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("/foo.json"), ".json");
        assert_eq!(path_extension("/foo"), "");
        assert_eq!(path_extension("/"), "");
        assert_eq!(path_extension(""), "");
        assert_eq!(path_extension("/archive.tar.gz"), ".gz");
        assert_eq!(path_extension("/v1.2/users"), "");
        assert_eq!(path_extension("/v1.2/users.xml"), ".xml");
        assert_eq!(path_extension("/foo."), ".");
        assert_eq!(path_extension("/.hidden"), ".hidden");
    }

    #[test]
    fn test_accept_tokens_are_verbatim() {
        let tokens = accept_tokens(b"text/html, application/json;q=0.9").collect::<Vec<_>>();
        assert_eq!(tokens, ["text/html", " application/json;q=0.9"]);

        assert_eq!(accept_tokens(b"").collect::<Vec<_>>(), [""]);
        assert_eq!(accept_tokens(b"a,,b").collect::<Vec<_>>(), ["a", "", "b"]);
    }

    #[test]
    fn test_accept_tokens_skip_only_invalid_utf8() {
        let tokens = accept_tokens(b"text/x-\xe9,application/json,text/\xff\xfe").collect::<Vec<_>>();
        assert_eq!(tokens, ["application/json"]);

        let tokens = accept_tokens("text/x-\u{e9},text/html".as_bytes()).collect::<Vec<_>>();
        assert_eq!(tokens, ["text/x-\u{e9}", "text/html"]);
    }

    #[test]
    fn test_request_view_for_request() {
        let request = Request::builder()
            .uri("http://localhost/users/1.json?pretty=true")
            .header(http::header::ACCEPT, "application/xml")
            .body(())
            .unwrap();

        assert_eq!(request.path(), "/users/1.json");
        assert_eq!(request.accept(), Some(b"application/xml".as_slice()));

        let (parts, _) = request.into_parts();
        assert_eq!(parts.path(), "/users/1.json");
        assert_eq!(parts.accept(), Some(b"application/xml".as_slice()));
    }

    #[test]
    fn test_request_view_uses_first_accept() {
        let uri = Uri::from_static("/");
        let mut headers = HeaderMap::new();
        headers.append(http::header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.append(http::header::ACCEPT, HeaderValue::from_static("text/html"));

        assert_eq!((&uri, &headers).accept(), Some(b"application/json".as_slice()));
    }

    #[test]
    fn test_request_view_without_accept() {
        let uri = Uri::from_static("/");
        let mut headers = HeaderMap::new();
        assert_eq!((&uri, &headers).accept(), None);

        headers.insert(http::header::ACCEPT, HeaderValue::from_bytes(b"text/\xffhtml").unwrap());
        assert_eq!((&uri, &headers).accept(), Some(b"text/\xffhtml".as_slice()));
    }
}
