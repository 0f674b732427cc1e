use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::{Body, Method, Request, Response};
use std::io::{Error, ErrorKind, Read, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Media types accepted when probing or fetching an ontology on the web.
pub const ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["application/rdf+xml", "text/turtle", "text/plain", "text/html"];

const ACCEPT_HEADER: &str =
    "text/turtle, application/rdf+xml;q=0.9, application/n-triples;q=0.8, text/plain;q=0.5, */*;q=0.1";

/// Checks a `Content-Type` header value against [`ALLOWED_CONTENT_TYPES`], ignoring its parameters.
///
/// ```
/// use oxonto::web::is_allowed_content_type;
///
/// assert!(is_allowed_content_type("text/turtle; charset=utf-8"));
/// assert!(!is_allowed_content_type("application/json"));
/// ```
pub fn is_allowed_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&media_type.as_str())
}

/// An ontology document fetched from the web.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDocument {
    /// The `Content-Type` header of the response.
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Access to ontologies published on the web.
pub trait WebAccess: Send + Sync {
    /// Checks that `url` answers `200 OK` with one of the [`ALLOWED_CONTENT_TYPES`].
    ///
    /// Malformed URLs and transport errors are reported as `false`.
    fn exists(&self, url: &str) -> bool;

    /// Downloads the document at `url`.
    fn fetch(&self, url: &str) -> Result<WebDocument>;
}

/// [`WebAccess`] through an HTTP client.
#[derive(Clone)]
pub struct HttpWebAccess {
    client: Arc<oxhttp::Client>,
}

impl HttpWebAccess {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Self {
        Self {
            client: Arc::new(http_client(timeout, redirection_limit)),
        }
    }

    fn request(&self, method: Method, url: &str) -> Result<Response<Body>> {
        let parsed = Url::parse(url).map_err(invalid_input_error)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid_input_error(format!("{url} is not an HTTP(S) URL")));
        }
        let request = Request::builder()
            .method(method)
            .uri(parsed.as_str())
            .header(ACCEPT, ACCEPT_HEADER)
            .body(())
            .map_err(invalid_input_error)?;
        self.client.request(request)
    }
}

impl Default for HttpWebAccess {
    fn default() -> Self {
        Self::new(None, 5)
    }
}

impl WebAccess for HttpWebAccess {
    fn exists(&self, url: &str) -> bool {
        let response = match self.request(Method::GET, url) {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "URL is not reachable");
                return false;
            }
        };
        if response.status().as_u16() != 200 {
            debug!(url, status = %response.status(), "URL did not answer 200");
            return false;
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let allowed = is_allowed_content_type(content_type);
        if !allowed {
            debug!(url, content_type, "URL answered with an unsupported content type");
        }
        allowed
    }

    fn fetch(&self, url: &str) -> Result<WebDocument> {
        let response = self.request(Method::GET, url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::other(format!(
                "Error {} returned by {} with payload:\n{}",
                status,
                url,
                response.into_body().to_string()?
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .ok_or_else(|| invalid_data_error(format!("No Content-Type returned by {url}")))?
            .to_str()
            .map_err(invalid_data_error)?
            .to_owned();
        let mut body = Vec::new();
        response.into_body().read_to_end(&mut body)?;
        Ok(WebDocument { content_type, body })
    }
}

pub(crate) fn http_client(timeout: Option<Duration>, redirection_limit: usize) -> oxhttp::Client {
    let mut client = match oxhttp::Client::new()
        .with_redirection_limit(redirection_limit)
        .with_user_agent(concat!("oxonto/", env!("CARGO_PKG_VERSION")))
    {
        Ok(client) => client,
        Err(e) => {
            debug!(error = ?e, "Invalid user agent, using the default one");
            oxhttp::Client::new().with_redirection_limit(redirection_limit)
        }
    };
    if let Some(timeout) = timeout {
        client = client.with_global_timeout(timeout);
    }
    client
}

pub(crate) fn invalid_data_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidData, error)
}

pub(crate) fn invalid_input_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidInput, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parameters_are_ignored() {
        assert!(is_allowed_content_type("application/rdf+xml"));
        assert!(is_allowed_content_type("Text/HTML ; charset=ISO-8859-1"));
        assert!(!is_allowed_content_type("application/ld+json"));
        assert!(!is_allowed_content_type(""));
    }

    #[test]
    fn non_http_urls_do_not_exist() {
        let web = HttpWebAccess::default();
        assert!(!web.exists("not a url"));
        assert!(!web.exists("file:///etc/hosts"));
        assert!(web.fetch("ftp://example.com/onto.owl").is_err());
    }
}
