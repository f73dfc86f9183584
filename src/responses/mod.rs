pub mod errors;
pub mod html;

pub use errors::html_error_response;
pub use html::{css_response, html_response, redirect_response};

use astra::Response;
use http::HeaderValue;

/// Attaches a `Set-Cookie` header when one is given.
pub fn with_cookie(mut resp: Response, cookie: Option<String>) -> Response {
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        resp.headers_mut().append("Set-Cookie", value);
    }
    resp
}
