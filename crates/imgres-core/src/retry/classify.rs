//! Map provider responses and transport failures onto [`ErrorKind`].

use crate::retry::policy::ErrorKind;

/// Results page status codes. 429/503 are the provider's rate limiting;
/// 408 means it dropped a slow request. Any other 4xx is final.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        408 => ErrorKind::Timeout,
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Transport failures while fetching a results page.
///
/// A truncated body (`partial_file`) is treated like a dropped connection:
/// the page is refetched from scratch.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_read_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}
