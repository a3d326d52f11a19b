//! Header, cookie and query-string helpers shared by both normalizers.

use std::borrow::Cow;

/// Request header carrying folded cookies.
pub const COOKIE: &str = "cookie";

/// Response header carrying cookies to set.
pub const SET_COOKIE: &str = "set-cookie";

/// Joins discrete cookie entries into a single `cookie` header value.
///
/// Entries are joined with a bare `;`, which is what the gateway's own folding produces.
#[must_use]
pub fn join_cookies(cookies: &[String]) -> String {
    cookies.join(";")
}

/// Decodes one form-urlencoded component (`+` is a space).
///
/// Input that does not decode to UTF-8 is returned unchanged.
#[must_use]
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| raw.to_string(), Cow::into_owned)
}

/// Percent-encodes one query key or value.
#[must_use]
pub fn encode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}
