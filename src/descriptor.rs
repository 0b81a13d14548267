use serde::Serialize;

use crate::{CourierError, Method, Result, RetryPolicy};

/// Declarative definition of one API call.
///
/// The resolved URL is the literal concatenation of [`base_url`],
/// [`api_path`], [`version`], [`resource`], and [`endpoint`] — segments
/// carry their own slashes, nothing is inserted between them. Query pairs
/// are percent-encoded in insertion order.
///
/// All fields have defaults, so a descriptor can be built either as a
/// struct literal over [`Default`] or with the chainable helpers:
///
/// ```
/// use courier_http::RequestDescriptor;
///
/// let users = RequestDescriptor::new("https://api.example.com")
///     .api_path("/v1")
///     .resource("/users")
///     .endpoint("/42")
///     .query("active", "true");
/// ```
///
/// [`base_url`]: RequestDescriptor::base_url
/// [`api_path`]: RequestDescriptor::api_path
/// [`version`]: RequestDescriptor::version
/// [`resource`]: RequestDescriptor::resource
/// [`endpoint`]: RequestDescriptor::endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// Scheme and host, e.g. `https://api.example.com`.
    pub base_url: String,
    /// Leading path segment, e.g. `/api`.
    pub api_path: String,
    /// API version segment, e.g. `/v1`.
    pub version: String,
    /// Resource segment, e.g. `/users`.
    pub resource: String,
    /// Final endpoint segment, e.g. `/42`.
    pub endpoint: String,
    /// Query pairs, encoded in insertion order.
    pub query: Vec<(String, String)>,
    /// Extra headers, applied in order; later entries overwrite earlier
    /// ones of the same name. `Authorization` set here is overwritten by
    /// the bearer token when [`needs_auth`](RequestDescriptor::needs_auth)
    /// is true and a token is present.
    pub headers: Vec<(String, String)>,
    /// Request body, attached verbatim.
    pub body: Option<Vec<u8>>,
    /// HTTP method, `GET` by default.
    pub method: Method,
    /// `Content-Type` header value, `application/json` by default.
    pub content_type: String,
    /// Whether to inject `Authorization: Bearer <token>` from the session.
    pub needs_auth: bool,
    /// Retry rule for transport failures; `None` means a single attempt.
    pub retry: Option<RetryPolicy>,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_path: String::new(),
            version: String::new(),
            resource: String::new(),
            endpoint: String::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            method: Method::Get,
            content_type: "application/json".to_owned(),
            needs_auth: true,
            retry: None,
        }
    }
}

impl RequestDescriptor {
    /// Creates a GET descriptor for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Appends one query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends one header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches an opaque byte body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as JSON and attaches it as the body.
    ///
    /// The content type is left as configured (`application/json` unless
    /// overridden).
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value)
            .map_err(|err| CourierError::Decode(format!("body serialization failed: {err}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Disables bearer-token injection for this call.
    pub fn no_auth(mut self) -> Self {
        self.needs_auth = false;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}
