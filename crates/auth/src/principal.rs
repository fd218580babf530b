//! Resolves an inbound request's [`Principal`] from whichever credential
//! it carries. Kept framework-agnostic like `oncall_domain::error` — the
//! gateway extracts headers/body into a [`Credentials`] value and hands
//! it here.

use oncall_domain::model::Principal;
use oncall_domain::{time, Error, Result};
use oncall_store::Store;

use crate::hmac_auth::verify_signature;

/// The handful of ways a request can present a credential, gathered by
/// the gateway before calling [`resolve_principal`].
#[derive(Default)]
pub struct Credentials<'a> {
    /// `X-Forwarded-User` (or equivalent) set by an upstream SSO proxy.
    pub sso_user: Option<&'a str>,
    /// Browser session cookie value.
    pub session_id: Option<&'a str>,
    /// CSRF token carried alongside the session, required for any
    /// state-changing verb.
    pub csrf_token: Option<&'a str>,
    /// Parsed out of `Authorization: hmac <app>:<base64url-digest>` for
    /// machine clients.
    pub app_name: Option<&'a str>,
    pub app_signature: Option<&'a str>,
    pub method: &'a str,
    pub path: &'a str,
    pub body: &'a [u8],
}

/// Resolve a [`Principal`] from whatever credential `creds` carries, in
/// priority order: application signature, session, SSO header. When
/// `require_auth` is false (debug config), an unauthenticated request
/// resolves to a synthetic god user instead of failing closed.
pub async fn resolve_principal(
    store: &Store,
    creds: &Credentials<'_>,
    require_auth: bool,
) -> Result<Principal> {
    if let (Some(name), Some(sig)) = (creds.app_name, creds.app_signature) {
        let app = store
            .read(|t| t.applications.get(name).cloned())
            .await
            .ok_or_else(|| Error::unauthorized("unknown application"))?;
        let now = time::now();
        if !verify_signature(
            app.api_key.as_bytes(),
            creds.method,
            creds.path,
            creds.body,
            sig,
            now,
        ) {
            return Err(Error::unauthorized("invalid application signature"));
        }
        return Ok(Principal::Application { name: app.name });
    }

    if let Some(session_id) = creds.session_id {
        let session = store
            .read(|t| t.sessions.get(session_id).cloned())
            .await
            .ok_or_else(|| Error::unauthorized("session not found"))?;
        let csrf_ok = creds
            .csrf_token
            .map(|provided| {
                use subtle::ConstantTimeEq;
                bool::from(provided.as_bytes().ct_eq(session.csrf_token.as_bytes()))
            })
            .unwrap_or(false);
        if !csrf_ok {
            return Err(Error::unauthorized("missing or invalid CSRF token"));
        }
        let user = store
            .read(move |t| t.users.get(&session.user_id).cloned())
            .await
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        return Ok(Principal::User {
            id: user.id,
            name: user.name,
        });
    }

    if let Some(name) = creds.sso_user {
        let user = store
            .read(|t| t.user_id_by_name(name).and_then(|id| t.users.get(&id).cloned()))
            .await
            .ok_or_else(|| Error::unauthorized("unknown SSO user"))?;
        return Ok(Principal::User {
            id: user.id,
            name: user.name,
        });
    }

    if !require_auth {
        return Ok(Principal::User {
            id: 0,
            name: "debug".to_string(),
        });
    }

    Err(Error::unauthorized("no credentials presented"))
}
