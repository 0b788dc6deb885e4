use log::{debug, info};

use crate::{
    markup::{self, CSRF_FIELD},
    Credentials, Error, Result, Session,
};

/// Logs `credentials` in on `session`.
///
/// Fetches the login form for a fresh anti-forgery token, then submits it
/// along with the credentials. The site answers 200 whether or not the
/// login worked, so success is read off the returned page. On success the
/// session's cookie jar holds the login.
pub async fn authenticate(session: &Session, credentials: &Credentials) -> Result<()> {
    let url = session.url("/login");

    let page = session.get_page(&url).await?;
    let token =
        markup::extract_csrf_token(&page).ok_or(Error::TokenMissing { page: "login" })?;

    debug!("logging in as {}", credentials.identifier());
    let form = [
        (CSRF_FIELD, token.as_str()),
        ("nick", credentials.identifier()),
        ("pass", credentials.expose_secret()),
    ];
    let res = session.post_form(&url, &form).await?;
    let body = res.text().await.map_err(|e| Error::transport(&url, e))?;

    if !markup::shows_logged_in(&body) {
        return Err(Error::AuthenticationFailed);
    }

    info!("logged in as {}", credentials.identifier());
    Ok(())
}
