//! Response plumbing shared by the HTML-facing handlers: cookies, flash
//! messages, and the JSON page envelope a template layer renders.

pub mod cookies;
pub mod flash;

use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use self::{
    cookies::clear_cookie,
    flash::{Flash, IncomingFlash, FLASH_COOKIE},
};

/// A view payload plus the flash message consumed while rendering it.
pub struct Page<T> {
    flash: Option<Flash>,
    clear_flash: bool,
    body: T,
}

impl<T> Page<T> {
    pub fn new(incoming: IncomingFlash, body: T) -> Self {
        Self {
            flash: incoming.flash,
            clear_flash: incoming.present,
            body,
        }
    }
}

#[derive(Serialize)]
struct PageBody<'a, T> {
    flash: Option<&'a Flash>,
    #[serde(flatten)]
    page: &'a T,
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let mut res = Json(PageBody {
            flash: self.flash.as_ref(),
            page: &self.body,
        })
        .into_response();
        if self.clear_flash {
            if let Ok(v) = HeaderValue::from_str(&clear_cookie(FLASH_COOKIE)) {
                res.headers_mut().append(SET_COOKIE, v);
            }
        }
        res
    }
}

/// Payload of a GET form view.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    pub action: &'static str,
    pub fields: &'static [&'static str],
}
