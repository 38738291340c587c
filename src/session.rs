use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

/// Server-side session identity carried by a cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    pub id: String,
    /// True when the request carried no usable cookie and a new id was issued
    pub is_new: bool,
}

impl SessionId {
    /// Reuse the id from `cookie_name` if it is a well-formed UUID, otherwise issue a new one
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        match find_cookie(headers, cookie_name).and_then(|v| Uuid::parse_str(&v).ok()) {
            Some(uuid) => Self {
                id: uuid.to_string(),
                is_new: false,
            },
            None => Self {
                id: Uuid::new_v4().to_string(),
                is_new: true,
            },
        }
    }

    /// `Set-Cookie` header for a freshly issued id
    pub fn set_cookie_header(&self, cookie_name: &str) -> Option<(axum::http::HeaderName, HeaderValue)> {
        if !self.is_new {
            return None;
        }
        let value = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, self.id);
        HeaderValue::from_str(&value).ok().map(|v| (SET_COOKIE, v))
    }
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}
