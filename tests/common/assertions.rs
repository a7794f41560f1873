//! Custom assertion macros
//!
//! Assertions over `TestResponse` that print the body on failure.

/// Assert the response status, returning the body
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response = $response;
        assert_eq!(
            response.status, $status,
            "unexpected status, body: {}",
            response.body
        );
        response.body
    }};
}

/// Assert an error response with the given status and message
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $status:expr, $message:expr) => {{
        let body = $crate::assert_status!($response, $status);
        assert_eq!(body["error"], $message, "unexpected error body: {}", body);
        assert_eq!(body["status"], $status.as_u16());
        body
    }};
}
