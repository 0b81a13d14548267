/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    /// The descriptor's composed URL string does not parse as an absolute URL.
    ///
    /// Carries the offending string. Never retried: a malformed request
    /// cannot succeed by retrying.
    #[error("malformed request URL: {0}")]
    MalformedUrl(String),
    /// A header name or value in the descriptor is not legal HTTP.
    #[error("invalid header '{name}'")]
    InvalidHeader {
        /// Name of the offending header.
        name: String,
    },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The call was aborted through its [`CancelToken`](crate::CancelToken).
    #[error("call cancelled")]
    Cancelled,
    /// Body encoding or interpretation error from the
    /// [`Response`](crate::Response) and
    /// [`RequestDescriptor`](crate::RequestDescriptor) JSON helpers.
    /// Never produced by `execute` itself.
    #[error("decode error: {0}")]
    Decode(String),
}
