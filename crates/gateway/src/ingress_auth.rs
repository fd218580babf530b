//! Pulls the handful of credential shapes recognized out of
//! an inbound request's headers, then hands them to
//! `oncall_auth::resolve_principal`. Kept here rather than in
//! `oncall-auth` since it is the one place in the system allowed to
//! know about HTTP headers.

use axum::http::HeaderMap;
use oncall_domain::model::Principal;
use oncall_store::Store;

use crate::error::ApiError;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Splits `Authorization: hmac <app>:<base64url-digest>` into its two
/// parts. Any other scheme (or a malformed value) yields `None`, falling
/// through to the next credential kind.
fn parse_hmac_authorization(headers: &HeaderMap) -> (Option<&str>, Option<&str>) {
    let Some(value) = header(headers, "authorization") else {
        return (None, None);
    };
    let Some(rest) = value.strip_prefix("hmac ") else {
        return (None, None);
    };
    match rest.split_once(':') {
        Some((app, digest)) if !app.is_empty() && !digest.is_empty() => (Some(app), Some(digest)),
        _ => (None, None),
    }
}

pub async fn authenticate(
    store: &Store,
    require_auth: bool,
    headers: &HeaderMap,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<Principal, ApiError> {
    let (app_name, app_signature) = parse_hmac_authorization(headers);
    let creds = oncall_auth::Credentials {
        sso_user: header(headers, "x-forwarded-user"),
        session_id: header(headers, "x-session-id"),
        csrf_token: header(headers, "x-csrf-token"),
        app_name,
        app_signature,
        method,
        path,
        body,
    };
    oncall_auth::resolve_principal(store, &creds, require_auth)
        .await
        .map_err(ApiError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_app_and_digest_from_hmac_scheme() {
        let headers = headers_with_authorization("hmac myapp:c29tZS1kaWdlc3Q");
        assert_eq!(
            parse_hmac_authorization(&headers),
            (Some("myapp"), Some("c29tZS1kaWdlc3Q"))
        );
    }

    #[test]
    fn ignores_other_authorization_schemes() {
        let headers = headers_with_authorization("Bearer sometoken");
        assert_eq!(parse_hmac_authorization(&headers), (None, None));
    }

    #[test]
    fn missing_header_yields_no_credential() {
        assert_eq!(parse_hmac_authorization(&HeaderMap::new()), (None, None));
    }
}
