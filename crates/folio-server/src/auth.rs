//! Caller identification.
//!
//! Sign-in is handled by the external authentication provider, which puts the
//! user's id in the `x-user-id` header. A missing or unparsable header means
//! nobody is signed in; reads then see an empty collection and writes fail
//! with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::UserId;
use std::convert::Infallible;

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The signed-in user making the request, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Option<UserId>);

impl Caller {
    pub fn user(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<UserId>().ok());
        Ok(Caller(user))
    }
}
