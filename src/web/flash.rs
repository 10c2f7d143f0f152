use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cookies::{read_cookie, set_cookie};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

/// One-shot message carried across a redirect in the `flash` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Cookie-safe form: base64url of the JSON payload.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        Base64UrlUnpadded::encode_string(&json)
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = Base64UrlUnpadded::decode_vec(raw).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Flash message pending for this request. `present` is set whenever a flash
/// cookie arrived, even one that failed to decode, so it still gets cleared.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    pub flash: Option<Flash>,
    pub present: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = read_cookie(&parts.headers, FLASH_COOKIE);
        Ok(IncomingFlash {
            flash: raw.and_then(Flash::decode),
            present: raw.is_some(),
        })
    }
}

/// `303 See Other` with an optional flash message and extra `Set-Cookie` values.
#[derive(Debug)]
pub struct FlashRedirect {
    location: String,
    flash: Option<Flash>,
    cookies: Vec<String>,
}

impl FlashRedirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: None,
            cookies: Vec::new(),
        }
    }

    pub fn success(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::to(location).with_flash(Flash::new(FlashLevel::Success, message))
    }

    pub fn info(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::to(location).with_flash(Flash::new(FlashLevel::Info, message))
    }

    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::to(location).with_flash(Flash::new(FlashLevel::Error, message))
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut res = Redirect::to(&self.location).into_response();
        let flash_cookie = self
            .flash
            .map(|f| set_cookie(FLASH_COOKIE, &f.encode(), None, false));
        for cookie in self.cookies.into_iter().chain(flash_cookie) {
            match HeaderValue::from_str(&cookie) {
                Ok(v) => {
                    res.headers_mut().append(SET_COOKIE, v);
                }
                Err(e) => warn!(error = %e, "dropping unencodable cookie"),
            }
        }
        res
    }
}
