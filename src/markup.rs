//! Everything inferred from the site's HTML lives here.
//!
//! The site has no API telling us whether a session is logged in, so the
//! state is read off incidental markup. Keep those heuristics in this module
//! so they can be swapped when the markup changes.

use scraper::{Html, Selector};

/// Name of the anti-forgery field on every form of the site.
pub const CSRF_FIELD: &str = "csrf_token";

/// Returns the `value` of the first `<input name="{field}">` in `html`.
///
/// Parsing never fails: malformed markup is repaired by the HTML parser and a
/// missing field (or a field without a value) yields `None`.
pub fn extract_hidden_field(html: &str, field: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let inputs = Selector::parse("input").unwrap();
    document
        .select(&inputs)
        .find(|node| node.value().attr("name") == Some(field))
        .and_then(|node| node.value().attr("value"))
        .map(|value| value.to_string())
}

/// Shorthand for the anti-forgery token of a page.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    extract_hidden_field(html, CSRF_FIELD)
}

/// True when a page is rendered for a logged-in user (it offers a logout).
pub fn shows_logged_in(body: &str) -> bool {
    body.contains("Logout") || body.contains("/logout")
}

/// True when a page asks the visitor to log in.
pub fn shows_login_prompt(body: &str) -> bool {
    body.contains("Login")
}
