use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;

use crate::{CourierError, RequestDescriptor, Result};

/// Concatenates the descriptor's URL parts in declaration order.
///
/// Segments carry their own separators; nothing is inserted between them.
pub(crate) fn compose_url(descriptor: &RequestDescriptor) -> String {
    format!(
        "{}{}{}{}{}",
        descriptor.base_url,
        descriptor.api_path,
        descriptor.version,
        descriptor.resource,
        descriptor.endpoint
    )
}

/// Resolves a descriptor into a ready-to-send transport request.
///
/// Header precedence: `Content-Type` from the descriptor first, then the
/// descriptor's headers in order (same-named entries overwrite), then
/// `Authorization: Bearer <token>` when auth is required and a non-empty
/// token is present — so a custom `Authorization` header loses to the
/// session token.
pub(crate) fn build_request(
    descriptor: &RequestDescriptor,
    token: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Request> {
    let raw = compose_url(descriptor);
    let mut url = Url::parse(&raw).map_err(|_| CourierError::MalformedUrl(raw.clone()))?;

    if !descriptor.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &descriptor.query {
            pairs.append_pair(key, value);
        }
    }

    let mut request = reqwest::Request::new(descriptor.method.as_reqwest(), url);
    let headers = request.headers_mut();

    let content_type = HeaderValue::from_str(&descriptor.content_type).map_err(|_| {
        CourierError::InvalidHeader {
            name: CONTENT_TYPE.as_str().to_owned(),
        }
    })?;
    headers.insert(CONTENT_TYPE, content_type);

    for (name, value) in &descriptor.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| CourierError::InvalidHeader {
                name: name.clone(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| CourierError::InvalidHeader {
                name: name.clone(),
            })?;
        headers.insert(header_name, header_value);
    }

    if descriptor.needs_auth {
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                CourierError::InvalidHeader {
                    name: AUTHORIZATION.as_str().to_owned(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
    }

    if let Some(body) = &descriptor.body {
        *request.body_mut() = Some(body.clone().into());
    }
    *request.timeout_mut() = Some(timeout);

    Ok(request)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::{build_request, compose_url};
    use crate::{CourierError, Method, RequestDescriptor};

    const TIMEOUT: Duration = Duration::from_secs(15);

    fn users_descriptor() -> RequestDescriptor {
        RequestDescriptor::new("https://api.example.com")
            .api_path("/v1")
            .resource("/users")
            .endpoint("/42")
    }

    #[test]
    fn url_is_literal_concatenation_of_segments() {
        let request = build_request(&users_descriptor(), None, TIMEOUT).expect("must build");
        assert_eq!(request.url().as_str(), "https://api.example.com/v1/users/42");
    }

    #[test]
    fn query_pairs_are_encoded_in_insertion_order() {
        let descriptor = users_descriptor()
            .query("active", "true")
            .query("name", "Kit Fox");
        let request = build_request(&descriptor, None, TIMEOUT).expect("must build");
        assert_eq!(
            request.url().query(),
            Some("active=true&name=Kit+Fox")
        );
    }

    #[test]
    fn malformed_url_fails_with_the_offending_string() {
        let descriptor = RequestDescriptor::new("not a url").endpoint("/x");
        let err = build_request(&descriptor, None, TIMEOUT).expect_err("must fail");
        match err {
            CourierError::MalformedUrl(raw) => assert_eq!(raw, "not a url/x"),
            other => panic!("expected MalformedUrl, got {other:?}"),
        }
    }

    #[test]
    fn content_type_defaults_to_json() {
        let request = build_request(&users_descriptor(), None, TIMEOUT).expect("must build");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"application/json".as_slice())
        );
    }

    #[test]
    fn custom_headers_overwrite_content_type() {
        let descriptor = users_descriptor().header("Content-Type", "text/plain");
        let request = build_request(&descriptor, None, TIMEOUT).expect("must build");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"text/plain".as_slice())
        );
    }

    #[test]
    fn bearer_token_is_injected_exactly() {
        let request = build_request(&users_descriptor(), Some("T"), TIMEOUT).expect("must build");
        assert_eq!(
            request.headers().get(AUTHORIZATION).map(|v| v.as_bytes()),
            Some(b"Bearer T".as_slice())
        );
    }

    #[test]
    fn bearer_token_overwrites_custom_authorization() {
        let descriptor = users_descriptor().header("Authorization", "Basic nope");
        let request = build_request(&descriptor, Some("T"), TIMEOUT).expect("must build");
        assert_eq!(
            request.headers().get(AUTHORIZATION).map(|v| v.as_bytes()),
            Some(b"Bearer T".as_slice())
        );
    }

    #[test]
    fn no_auth_descriptor_never_gets_authorization() {
        let descriptor = users_descriptor().no_auth();
        let request = build_request(&descriptor, Some("T"), TIMEOUT).expect("must build");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn empty_token_sets_no_authorization() {
        let request = build_request(&users_descriptor(), Some(""), TIMEOUT).expect("must build");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn custom_authorization_survives_when_no_token_present() {
        let descriptor = users_descriptor().header("Authorization", "Basic abc");
        let request = build_request(&descriptor, None, TIMEOUT).expect("must build");
        assert_eq!(
            request.headers().get(AUTHORIZATION).map(|v| v.as_bytes()),
            Some(b"Basic abc".as_slice())
        );
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let descriptor = users_descriptor().header("bad name", "value");
        let err = build_request(&descriptor, None, TIMEOUT).expect_err("must fail");
        match err {
            CourierError::InvalidHeader { name } => assert_eq!(name, "bad name"),
            other => panic!("expected InvalidHeader, got {other:?}"),
        }
    }

    #[test]
    fn body_and_method_are_carried_verbatim() {
        let descriptor = users_descriptor()
            .method(Method::Post)
            .body(b"payload".to_vec());
        let request = build_request(&descriptor, None, TIMEOUT).expect("must build");
        assert_eq!(request.method(), reqwest::Method::POST);
        let body = request.body().expect("body must be set");
        assert_eq!(body.as_bytes(), Some(b"payload".as_slice()));
    }

    #[test]
    fn compose_url_inserts_nothing_between_segments() {
        let descriptor = RequestDescriptor::new("https://host").resource("users");
        assert_eq!(compose_url(&descriptor), "https://hostusers");
    }
}
