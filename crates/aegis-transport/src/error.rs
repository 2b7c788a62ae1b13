//! Typed transport failures.

/// Terminal outcome of an RPC call that did not succeed.
///
/// Retryable statuses only surface here once the retry budget is exhausted;
/// non-retryable statuses map immediately. For mutating calls a transport
/// error means "the call may or may not have happened" — callers must not
/// assume either way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// UNAVAILABLE after the retry budget ran out.
    #[error("Server Unavailable")]
    Unavailable,
    /// INTERNAL after the retry budget ran out.
    #[error("Internal Server Error")]
    RemoteInternal,
    /// DEADLINE_EXCEEDED after the retry budget ran out.
    #[error("Server Took Too Long To Respond")]
    DeadlineExceeded,
    /// UNAUTHENTICATED: a credential or certificate problem, never retried.
    #[error("Either Client Certificate Missing Or Server Certificate Invalid")]
    Unauthenticated,
    /// INVALID_ARGUMENT: the request was malformed, never retried.
    #[error("The Provided Input Is Incorrectly Formatted")]
    MalformedInput,
    /// UNIMPLEMENTED: the method does not exist on the remote service.
    #[error("RPC Call Does Not Exist Or Is Currently Not Implemented")]
    UnknownMethod,
    /// RESOURCE_EXHAUSTED: the payload exceeded the remote data limit.
    #[error("Maximum Data Provided Exceeds Data Limit")]
    PayloadTooLarge,
    /// The endpoint configuration itself was unusable.
    #[error("Invalid Transport Endpoint: {0}")]
    InvalidEndpoint(String),
    /// Anything else local or unclassified.
    #[error("An Unexpected Error Occurred")]
    Internal,
}

impl TransportError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable => "UNAVAILABLE",
            Self::RemoteInternal => "REMOTE_INTERNAL",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::MalformedInput => "MALFORMED_INPUT",
            Self::UnknownMethod => "UNKNOWN_METHOD",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Internal => "INTERNAL",
        }
    }

    /// HTTP status the gateway reports for this failure.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MalformedInput | Self::PayloadTooLarge => 400,
            Self::UnknownMethod => 501,
            Self::Unavailable
            | Self::RemoteInternal
            | Self::DeadlineExceeded
            | Self::Unauthenticated
            | Self::InvalidEndpoint(_)
            | Self::Internal => 500,
        }
    }
}
