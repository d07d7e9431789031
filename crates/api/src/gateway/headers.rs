//! Header sanitization for forwarded requests and relayed responses.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Request headers never sent to the backend. The outbound connection
/// sets its own `host`, and the body is re-streamed so its length is not
/// known up front.
pub const OUTBOUND_STRIPPED: [HeaderName; 2] = [header::HOST, header::CONTENT_LENGTH];

/// Response headers never relayed to the browser. They describe the
/// backend hop, not the gateway's own response.
pub const INBOUND_STRIPPED: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Content type set on relayed responses that lack one.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Copy of `headers` suitable for the outbound backend request.
pub fn sanitize_outbound(headers: &HeaderMap) -> HeaderMap {
    strip(headers, &OUTBOUND_STRIPPED)
}

/// Copy of backend response `headers` suitable for relaying, with a
/// `content-type` guaranteed.
pub fn sanitize_inbound(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = strip(headers, &INBOUND_STRIPPED);
    ensure_json_content_type(&mut sanitized);
    sanitized
}

/// Set `content-type: application/json` unless one is already present.
pub fn ensure_json_content_type(headers: &mut HeaderMap) {
    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
    }
}

fn strip(headers: &HeaderMap, names: &[HeaderName]) -> HeaderMap {
    let mut sanitized = headers.clone();
    for name in names {
        sanitized.remove(name);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn outbound_drops_host_and_length_only() {
        let input = headers(&[
            ("host", "localhost:3000"),
            ("content-length", "1234"),
            ("content-type", "multipart/form-data; boundary=x"),
            ("x-request-id", "abc"),
        ]);

        let out = sanitize_outbound(&input);

        assert!(!out.contains_key(header::HOST));
        assert!(!out.contains_key(header::CONTENT_LENGTH));
        assert_eq!(out[header::CONTENT_TYPE], "multipart/form-data; boundary=x");
        assert_eq!(out["x-request-id"], "abc");
    }

    #[test]
    fn inbound_drops_hop_by_hop_headers() {
        let input = headers(&[
            ("content-length", "17"),
            ("transfer-encoding", "chunked"),
            ("connection", "keep-alive"),
            ("content-type", "application/json"),
            ("server", "uvicorn"),
        ]);

        let out = sanitize_inbound(&input);

        for name in INBOUND_STRIPPED {
            assert!(!out.contains_key(&name), "{name} should be stripped");
        }
        assert_eq!(out[header::CONTENT_TYPE], "application/json");
        assert_eq!(out["server"], "uvicorn");
    }

    #[test]
    fn inbound_adds_missing_content_type() {
        let out = sanitize_inbound(&headers(&[("server", "uvicorn")]));
        assert_eq!(out[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
    }

    #[test]
    fn inbound_keeps_existing_content_type() {
        let out = sanitize_inbound(&headers(&[("content-type", "text/plain")]));
        assert_eq!(out[header::CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn repeated_headers_survive() {
        let input = headers(&[("set-cookie", "a=1"), ("set-cookie", "b=2")]);
        let out = sanitize_inbound(&input);
        assert_eq!(out.get_all("set-cookie").iter().count(), 2);
    }
}
