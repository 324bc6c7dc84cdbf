//! Request extractors for identity and session.
//!
//! Authentication itself is delegated to the external provider; the fronting
//! auth layer forwards the verified subject as headers. `X-Profile-ID` is
//! the authenticated profile, `X-Session-ID` an anonymous cart session.

use actix_web::{FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

use crate::cart::SessionKey;
use crate::errors::AppError;

fn header_string(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn header_uuid(req: &HttpRequest, name: &str) -> Option<Uuid> {
    header_string(req, name).and_then(|raw| Uuid::parse_str(&raw).ok())
}

/// The authenticated subject for gated routes, with the optional display
/// metadata the auth layer forwards alongside it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub profile_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl AuthenticatedUser {
    /// Display name for profile bootstrap: forwarded name, falling back to
    /// the email address.
    pub fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref().or(self.email.as_deref())
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match header_uuid(req, "X-Profile-ID") {
            Some(profile_id) => futures_util::future::ready(Ok(AuthenticatedUser {
                profile_id,
                full_name: header_string(req, "X-Profile-Name"),
                email: header_string(req, "X-Profile-Email"),
                avatar_url: header_string(req, "X-Profile-Avatar"),
            })),
            None => {
                warn!("Gated route hit without a valid X-Profile-ID header.");
                futures_util::future::ready(Err(AppError::Auth(
                    "User authentication required.".to_string(),
                )))
            }
        }
    }
}

/// Optional identity, for routes that only need to know whether a user is
/// signed in (navigation resolution).
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthenticated(pub Option<Uuid>);

impl FromRequest for MaybeAuthenticated {
    type Error = AppError;
    type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        futures_util::future::ready(Ok(MaybeAuthenticated(header_uuid(req, "X-Profile-ID"))))
    }
}

/// The key a request's cart lives under: the authenticated profile when one
/// is present, else the anonymous session id. Carts are reachable without
/// signing in, but not without any session at all.
#[derive(Debug, Clone, Copy)]
pub struct CartSession {
    pub key: SessionKey,
    pub profile_id: Option<Uuid>,
}

impl FromRequest for CartSession {
    type Error = AppError;
    type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let profile_id = header_uuid(req, "X-Profile-ID");
        let key = profile_id.or_else(|| header_uuid(req, "X-Session-ID"));
        match key {
            Some(key) => futures_util::future::ready(Ok(CartSession {
                key: SessionKey(key),
                profile_id,
            })),
            None => {
                warn!("Cart route hit without X-Profile-ID or X-Session-ID.");
                futures_util::future::ready(Err(AppError::Validation(
                    "A session is required to use the cart.".to_string(),
                )))
            }
        }
    }
}
