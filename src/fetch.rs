use std::fmt;

use log::{debug, info};
use reqwest::{header, StatusCode};

use crate::{
    markup::{self, CSRF_FIELD},
    Error, Result, Session,
};

/// Only presence is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Archive {
    bytes: Vec<u8>,
    file_name: Option<String>,
}

impl Archive {
    pub fn new(bytes: Vec<u8>, file_name: Option<String>) -> Self {
        Self { bytes, file_name }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A reply without `Content-Disposition` is an HTML page, not the archive.
pub async fn fetch_archive(session: &Session, task: &TaskId) -> Result<Archive> {
    let url = session.url(&format!("/problemset/tests/{}/", task));

    let page = session.get_page(&url).await?;
    if markup::shows_login_prompt(&page) {
        return Err(Error::NotAuthenticated {
            task: task.to_string(),
        });
    }

    let token =
        markup::extract_csrf_token(&page).ok_or(Error::TokenMissing { page: "tests" })?;

    let form = [(CSRF_FIELD, token.as_str()), ("download", "true")];
    let res = session.post_form(&url, &form).await?;

    let status = res.status();
    let disposition = match res.headers().get(header::CONTENT_DISPOSITION) {
        Some(value) if status == StatusCode::OK => {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        }
        _ => {
            return Err(Error::DownloadRejected {
                status: status.as_u16(),
            })
        }
    };

    let bytes = res
        .bytes()
        .await
        .map_err(|e| Error::transport(&url, e))?
        .to_vec();
    let file_name = attachment_file_name(&disposition);
    debug!("Content-Disposition: {}", disposition);
    info!(
        "downloaded {} ({} bytes)",
        file_name.as_deref().unwrap_or("test archive"),
        bytes.len()
    );

    Ok(Archive::new(bytes, file_name))
}

/// Pulls `filename` out of a `Content-Disposition` value.
fn attachment_file_name(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
