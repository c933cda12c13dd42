//! Static endpoint metadata.

/// Static metadata about an API endpoint, independent of any invocation.
///
/// Shape identifiers are type names supplied by the dispatch layer when it
/// registers the endpoint (for generated endpoints, `std::any::type_name`
/// of the payload structs). They are opaque to the runtime and are passed
/// through to the public view without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndpointDesc {
    /// Request-payload shape, or `None` when the endpoint takes no request
    /// payload or is raw.
    pub request_type: Option<&'static str>,
    /// Response-payload shape, or `None` when the endpoint returns no
    /// response payload or is raw.
    pub response_type: Option<&'static str>,
    /// Raw endpoints bypass payload decoding entirely.
    pub raw: bool,
}

impl EndpointDesc {
    pub fn new(
        request_type: Option<&'static str>,
        response_type: Option<&'static str>,
    ) -> Self {
        Self {
            request_type,
            response_type,
            raw: false,
        }
    }

    /// Descriptor for a raw endpoint: no decoded payload shapes.
    pub fn raw_endpoint() -> Self {
        Self {
            request_type: None,
            response_type: None,
            raw: true,
        }
    }
}
