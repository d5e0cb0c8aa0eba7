//! Endpoint descriptors: immutable descriptions of one remote operation.
//!
//! # Design
//! An `Endpoint` knows how to address an operation (scheme, host, path,
//! query, headers) but not how to execute it. `build_request` is a pure
//! transformation: it either yields one complete `HttpRequest` or fails with
//! `NetworkError::InvalidUrl`, never a partially-built request.
//!
//! Every service family is an `Endpoint` with different values; nothing in
//! the pipeline special-cases one family over another.

use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest};

/// Characters that would let a host string smuggle in a path, query or
/// userinfo component.
const HOST_DELIMITERS: &[char] = &['/', '?', '#', '@', '\\'];

/// Description of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    method: HttpMethod,
    query: Vec<(String, String)>,
    /// Query string taken verbatim from a service-supplied URL.
    raw_query: Option<String>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Endpoint {
    pub fn new(scheme: &str, host: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port: None,
            path: path.to_string(),
            method: HttpMethod::Get,
            query: Vec::new(),
            raw_query: None,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Decompose an absolute URL into an endpoint.
    ///
    /// Used for URLs handed back by a service, such as a poster location
    /// returned from an image search. The query string is kept byte for
    /// byte so signed or cache-busting URLs are requested unchanged. URLs
    /// carrying credentials are rejected.
    pub fn from_url(raw: &str) -> Result<Self, NetworkError> {
        let url = Url::parse(raw).map_err(|_| NetworkError::InvalidUrl)?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err(NetworkError::InvalidUrl);
        }
        let host = url.host_str().ok_or(NetworkError::InvalidUrl)?;
        let mut endpoint = Endpoint::new(url.scheme(), host, url.path());
        endpoint.port = url.port();
        endpoint.raw_query = url.query().map(str::to_string);
        Ok(endpoint)
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a query parameter. A repeated key replaces the earlier value in
    /// place, so every key appears once in the built URL.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.query.push((key.to_string(), value.to_string())),
        }
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_items(&self) -> &[(String, String)] {
        &self.query
    }

    /// Compose the absolute URL and copy method, headers and body onto a
    /// request.
    ///
    /// Header names and values must be sendable as-is; a value with a line
    /// break (an API key read with its trailing newline, say) is
    /// `InvalidUrl` here rather than a failure inside the dispatcher.
    pub fn build_request(&self) -> Result<HttpRequest, NetworkError> {
        let url = self.url()?;
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| NetworkError::InvalidUrl)?;
            HeaderValue::from_str(value).map_err(|_| NetworkError::InvalidUrl)?;
        }
        Ok(HttpRequest {
            method: self.method,
            url,
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }

    fn url(&self) -> Result<Url, NetworkError> {
        if self.path.is_empty() || self.host.is_empty() {
            return Err(NetworkError::InvalidUrl);
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(NetworkError::InvalidUrl);
        }
        if self
            .host
            .chars()
            .any(|c| c.is_whitespace() || HOST_DELIMITERS.contains(&c))
        {
            return Err(NetworkError::InvalidUrl);
        }

        let authority = match self.port {
            Some(port) => format!("{}://{}:{port}", self.scheme, self.host),
            None => format!("{}://{}", self.scheme, self.host),
        };
        let mut url = Url::parse(&authority).map_err(|_| NetworkError::InvalidUrl)?;
        url.set_path(&self.path);
        if let Some(raw) = &self.raw_query {
            url.set_query(Some(raw));
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Base location of a service, parsed once from configuration.
///
/// A base such as `http://127.0.0.1:3000/api` contributes scheme, host, port
/// and a path prefix to every endpoint built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBase {
    scheme: String,
    host: String,
    port: Option<u16>,
    prefix: String,
}

impl ServiceBase {
    pub fn parse(raw: &str) -> Result<Self, NetworkError> {
        let url = Url::parse(raw).map_err(|_| NetworkError::InvalidUrl)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(NetworkError::InvalidUrl);
        }
        let host = url.host_str().ok_or(NetworkError::InvalidUrl)?;
        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port(),
            prefix: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// A GET endpoint at `path` below this base.
    pub fn endpoint(&self, path: &str) -> Endpoint {
        let mut endpoint = Endpoint::new(&self.scheme, &self.host, &format!("{}{path}", self.prefix));
        endpoint.port = self.port;
        endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(request: &HttpRequest) -> Vec<(String, String)> {
        request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn builds_absolute_url_with_query() {
        let request = Endpoint::new("https", "example.com", "/movies/list.json")
            .query("targetDt", "20230724")
            .query("key", "abc")
            .build_request()
            .unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://example.com/movies/list.json?targetDt=20230724&key=abc"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn duplicate_query_key_keeps_last_value_once() {
        let request = Endpoint::new("http", "example.com", "/search")
            .query("q", "first")
            .query("page", "1")
            .query("q", "second")
            .build_request()
            .unwrap();
        assert_eq!(
            pairs(&request),
            vec![
                ("q".to_string(), "second".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let request = Endpoint::new("https", "example.com", "/v2/search/image")
            .query("query", "헤어질 결심 & more")
            .build_request()
            .unwrap();
        assert!(!request.url.as_str().contains(' '));
        assert_eq!(
            pairs(&request),
            vec![("query".to_string(), "헤어질 결심 & more".to_string())]
        );
    }

    #[test]
    fn empty_path_is_invalid() {
        let err = Endpoint::new("https", "example.com", "").build_request().unwrap_err();
        assert_eq!(err, NetworkError::InvalidUrl);
    }

    #[test]
    fn empty_host_is_invalid() {
        let err = Endpoint::new("https", "", "/x").build_request().unwrap_err();
        assert_eq!(err, NetworkError::InvalidUrl);
    }

    #[test]
    fn host_with_delimiters_is_invalid() {
        for host in ["evil.com/path", "a b.com", "user@host", "host?x=1"] {
            let err = Endpoint::new("https", host, "/x").build_request().unwrap_err();
            assert_eq!(err, NetworkError::InvalidUrl, "{host}");
        }
    }

    #[test]
    fn non_http_scheme_is_invalid() {
        let err = Endpoint::new("ftp", "example.com", "/x").build_request().unwrap_err();
        assert_eq!(err, NetworkError::InvalidUrl);
    }

    #[test]
    fn port_and_headers_are_carried() {
        let request = Endpoint::new("http", "127.0.0.1", "/v2/search/image")
            .port(3000)
            .header("Authorization", "KakaoAK secret")
            .build_request()
            .unwrap();
        assert_eq!(request.url.as_str(), "http://127.0.0.1:3000/v2/search/image");
        assert_eq!(
            request.headers,
            vec![("Authorization".to_string(), "KakaoAK secret".to_string())]
        );
    }

    #[test]
    fn from_url_round_trips_components() {
        let endpoint = Endpoint::from_url("http://img.example.com:8080/posters/a.png?w=300").unwrap();
        assert_eq!(endpoint.host(), "img.example.com");
        assert_eq!(endpoint.path(), "/posters/a.png");
        let request = endpoint.build_request().unwrap();
        assert_eq!(request.url.as_str(), "http://img.example.com:8080/posters/a.png?w=300");
    }

    #[test]
    fn from_url_keeps_query_verbatim() {
        for raw in [
            "http://cdn.example.com/a.jpg?123456",
            "http://cdn.example.com/a.jpg?t=a%20b~c",
            "https://cdn.example.com/p/a.jpg?sig=AbC%2Bd%3D&exp=1700000000",
        ] {
            let request = Endpoint::from_url(raw).unwrap().build_request().unwrap();
            assert_eq!(request.url.as_str(), raw);
        }
    }

    #[test]
    fn from_url_rejects_credentials() {
        assert_eq!(
            Endpoint::from_url("http://u:p@cdn.example.com/a.jpg").unwrap_err(),
            NetworkError::InvalidUrl
        );
        assert_eq!(
            Endpoint::from_url("http://u@cdn.example.com/a.jpg").unwrap_err(),
            NetworkError::InvalidUrl
        );
    }

    #[test]
    fn unsendable_headers_are_invalid() {
        let bad_value = Endpoint::new("http", "example.com", "/v2/search/image")
            .header("Authorization", "KakaoAK key\n")
            .build_request()
            .unwrap_err();
        assert_eq!(bad_value, NetworkError::InvalidUrl);

        let bad_name = Endpoint::new("http", "example.com", "/x")
            .header("Bad Header", "v")
            .build_request()
            .unwrap_err();
        assert_eq!(bad_name, NetworkError::InvalidUrl);
    }

    #[test]
    fn from_url_rejects_garbage() {
        assert_eq!(Endpoint::from_url("not a url").unwrap_err(), NetworkError::InvalidUrl);
        assert_eq!(Endpoint::from_url("").unwrap_err(), NetworkError::InvalidUrl);
    }

    #[test]
    fn service_base_prefixes_paths() {
        let base = ServiceBase::parse("http://127.0.0.1:3000/api/").unwrap();
        let request = base.endpoint("/movies").query("id", "7").build_request().unwrap();
        assert_eq!(request.url.as_str(), "http://127.0.0.1:3000/api/movies?id=7");
    }

    #[test]
    fn service_base_rejects_non_http() {
        assert_eq!(ServiceBase::parse("mailto:a@b.c").unwrap_err(), NetworkError::InvalidUrl);
    }
}
